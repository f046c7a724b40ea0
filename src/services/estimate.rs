//! Per-expert estimate service: criterion evaluations and threat
//! probabilities.
//!
//! Every write runs in one transaction: lock the asset, change the
//! estimate row, then apply the matching [`AssetChange`] so the asset's
//! cached mean is refreshed before commit.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::estimate::{
    CreateEvaluation, CreateThreatProbability, EstimateFilters, Evaluation, EvaluationSummary,
    ThreatProbability, ThreatProbabilitySummary, UpdateEvaluation, UpdateThreatProbability,
};
use crate::services::aggregation::{self, AssetChange};

const DUPLICATE_EVALUATION: &str = "This expert has already evaluated the asset";
const DUPLICATE_PROBABILITY: &str = "This expert has already estimated the threat probability for the asset";

// -- Evaluations --

pub async fn list_evaluations(
    pool: &PgPool,
    filters: &EstimateFilters,
) -> Result<Vec<EvaluationSummary>, AppError> {
    let rows = sqlx::query_as::<_, EvaluationSummary>(
        r#"
        SELECT ev.id, ev.asset_id, a.name AS asset_name, ev.expert_id, x.name AS expert_name,
               ev.life_health, ev.economy, ev.ecology, ev.dependency, ev.social, ev.international
        FROM asset_evaluations ev
        JOIN assets a ON a.id = ev.asset_id
        JOIN experts x ON x.id = ev.expert_id
        WHERE ($1::uuid IS NULL OR ev.asset_id = $1)
          AND ($2::uuid IS NULL OR ev.expert_id = $2)
        ORDER BY a.name, x.name
        "#,
    )
    .bind(filters.asset_id)
    .bind(filters.expert_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_evaluation(pool: &PgPool, id: Uuid) -> Result<Evaluation, AppError> {
    sqlx::query_as::<_, Evaluation>("SELECT * FROM asset_evaluations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Evaluation {id} not found")))
}

/// Record an expert's evaluation and refresh the asset's criterion means.
pub async fn create_evaluation(
    pool: &PgPool,
    input: &CreateEvaluation,
) -> Result<Evaluation, AppError> {
    input.validate()?;

    let mut tx = pool.begin().await?;
    aggregation::lock_asset(&mut tx, input.asset_id).await?;

    let evaluation = sqlx::query_as::<_, Evaluation>(
        r#"
        INSERT INTO asset_evaluations (asset_id, expert_id, life_health, economy, ecology,
            dependency, social, international)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(input.asset_id)
    .bind(input.expert_id)
    .bind(input.scores.life_health)
    .bind(input.scores.economy)
    .bind(input.scores.ecology)
    .bind(input.scores.dependency)
    .bind(input.scores.social)
    .bind(input.scores.international)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::from_write(e, DUPLICATE_EVALUATION))?;

    aggregation::apply(&mut tx, &AssetChange::evaluations(input.asset_id)).await?;
    tx.commit().await?;

    Ok(evaluation)
}

/// Replace the scores of an evaluation. The (asset, expert) pair is fixed.
pub async fn update_evaluation(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateEvaluation,
) -> Result<Evaluation, AppError> {
    input.validate()?;
    let asset_id = evaluation_asset(pool, id).await?;

    let mut tx = pool.begin().await?;
    aggregation::lock_asset(&mut tx, asset_id).await?;

    let evaluation = sqlx::query_as::<_, Evaluation>(
        r#"
        UPDATE asset_evaluations
        SET life_health = $1, economy = $2, ecology = $3, dependency = $4,
            social = $5, international = $6, updated_at = NOW()
        WHERE id = $7
        RETURNING *
        "#,
    )
    .bind(input.scores.life_health)
    .bind(input.scores.economy)
    .bind(input.scores.ecology)
    .bind(input.scores.dependency)
    .bind(input.scores.social)
    .bind(input.scores.international)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Evaluation {id} not found")))?;

    aggregation::apply(&mut tx, &AssetChange::evaluations(asset_id)).await?;
    tx.commit().await?;

    Ok(evaluation)
}

/// Remove an evaluation. Removing the last one keeps the asset's means.
pub async fn delete_evaluation(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let asset_id = evaluation_asset(pool, id).await?;

    let mut tx = pool.begin().await?;
    aggregation::lock_asset(&mut tx, asset_id).await?;

    let result = sqlx::query("DELETE FROM asset_evaluations WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Evaluation {id} not found")));
    }

    aggregation::apply(&mut tx, &AssetChange::evaluations(asset_id)).await?;
    tx.commit().await?;
    Ok(())
}

async fn evaluation_asset(pool: &PgPool, id: Uuid) -> Result<Uuid, AppError> {
    sqlx::query_scalar::<_, Uuid>("SELECT asset_id FROM asset_evaluations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Evaluation {id} not found")))
}

// -- Threat probabilities --

pub async fn list_probabilities(
    pool: &PgPool,
    filters: &EstimateFilters,
) -> Result<Vec<ThreatProbabilitySummary>, AppError> {
    let rows = sqlx::query_as::<_, ThreatProbabilitySummary>(
        r#"
        SELECT tp.id, tp.asset_id, a.name AS asset_name, tp.expert_id, x.name AS expert_name,
               tp.probability
        FROM threat_probabilities tp
        JOIN assets a ON a.id = tp.asset_id
        JOIN experts x ON x.id = tp.expert_id
        WHERE ($1::uuid IS NULL OR tp.asset_id = $1)
          AND ($2::uuid IS NULL OR tp.expert_id = $2)
        ORDER BY a.name, x.name
        "#,
    )
    .bind(filters.asset_id)
    .bind(filters.expert_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_probability(pool: &PgPool, id: Uuid) -> Result<ThreatProbability, AppError> {
    sqlx::query_as::<_, ThreatProbability>("SELECT * FROM threat_probabilities WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Threat probability {id} not found")))
}

/// Record an expert's threat probability and refresh the asset's mean.
pub async fn create_probability(
    pool: &PgPool,
    input: &CreateThreatProbability,
) -> Result<ThreatProbability, AppError> {
    input.validate()?;

    let mut tx = pool.begin().await?;
    aggregation::lock_asset(&mut tx, input.asset_id).await?;

    let estimate = sqlx::query_as::<_, ThreatProbability>(
        r#"
        INSERT INTO threat_probabilities (asset_id, expert_id, probability)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(input.asset_id)
    .bind(input.expert_id)
    .bind(input.probability)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::from_write(e, DUPLICATE_PROBABILITY))?;

    aggregation::apply(&mut tx, &AssetChange::threat_probabilities(input.asset_id)).await?;
    tx.commit().await?;

    Ok(estimate)
}

pub async fn update_probability(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateThreatProbability,
) -> Result<ThreatProbability, AppError> {
    input.validate()?;
    let asset_id = probability_asset(pool, id).await?;

    let mut tx = pool.begin().await?;
    aggregation::lock_asset(&mut tx, asset_id).await?;

    let estimate = sqlx::query_as::<_, ThreatProbability>(
        r#"
        UPDATE threat_probabilities
        SET probability = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(input.probability)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Threat probability {id} not found")))?;

    aggregation::apply(&mut tx, &AssetChange::threat_probabilities(asset_id)).await?;
    tx.commit().await?;

    Ok(estimate)
}

pub async fn delete_probability(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let asset_id = probability_asset(pool, id).await?;

    let mut tx = pool.begin().await?;
    aggregation::lock_asset(&mut tx, asset_id).await?;

    let result = sqlx::query("DELETE FROM threat_probabilities WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Threat probability {id} not found")));
    }

    aggregation::apply(&mut tx, &AssetChange::threat_probabilities(asset_id)).await?;
    tx.commit().await?;
    Ok(())
}

async fn probability_asset(pool: &PgPool, id: Uuid) -> Result<Uuid, AppError> {
    sqlx::query_scalar::<_, Uuid>("SELECT asset_id FROM threat_probabilities WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Threat probability {id} not found")))
}

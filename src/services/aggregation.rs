//! Keeps each asset's cached means in sync with the per-expert estimates.
//!
//! Writers of evaluations and threat probabilities describe what they
//! touched as an [`AssetChange`] and apply it inside their own transaction,
//! after locking the asset row. The read-aggregate-write cycle therefore
//! runs atomically and concurrent submissions for the same asset queue up
//! behind the row lock.

use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::criteria::{CriterionScores, CRITERIA_COUNT};

/// Which estimate table a write touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreSource {
    Evaluations,
    ThreatProbabilities,
}

/// A write that invalidated an asset's cached means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssetChange {
    pub asset_id: Uuid,
    pub source: ScoreSource,
}

impl AssetChange {
    pub fn evaluations(asset_id: Uuid) -> Self {
        Self {
            asset_id,
            source: ScoreSource::Evaluations,
        }
    }

    pub fn threat_probabilities(asset_id: Uuid) -> Self {
        Self {
            asset_id,
            source: ScoreSource::ThreatProbabilities,
        }
    }
}

/// Means written back to an asset after a recompute.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecomputeOutcome {
    pub asset_id: Uuid,
    pub scores: Option<CriterionScores>,
    pub threat_probability: Option<f64>,
}

/// Column-wise arithmetic mean. `None` for an empty slice.
pub fn mean_scores(rows: &[CriterionScores]) -> Option<CriterionScores> {
    if rows.is_empty() {
        return None;
    }
    let mut sums = [0.0_f64; CRITERIA_COUNT];
    for row in rows {
        for (sum, value) in sums.iter_mut().zip(row.to_array()) {
            *sum += value;
        }
    }
    let n = rows.len() as f64;
    Some(CriterionScores::from_array(sums.map(|sum| sum / n)))
}

/// Arithmetic mean of probability estimates. `None` for an empty slice.
pub fn mean_probability(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Take the per-asset row lock. Fails with `NotFound` for unknown assets.
pub async fn lock_asset(conn: &mut PgConnection, asset_id: Uuid) -> Result<(), AppError> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM assets WHERE id = $1 FOR UPDATE")
        .bind(asset_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset {asset_id} not found")))?;
    Ok(())
}

/// Recompute the six criterion means from all evaluations of the asset.
///
/// With no evaluations the cached means are left as they are.
pub async fn recompute_asset_scores(
    conn: &mut PgConnection,
    asset_id: Uuid,
) -> Result<Option<CriterionScores>, AppError> {
    let rows = sqlx::query_as::<_, CriterionScores>(
        r#"
        SELECT life_health, economy, ecology, dependency, social, international
        FROM asset_evaluations
        WHERE asset_id = $1
        "#,
    )
    .bind(asset_id)
    .fetch_all(&mut *conn)
    .await?;

    let Some(means) = mean_scores(&rows) else {
        tracing::debug!(%asset_id, "No evaluations; keeping cached criterion means");
        return Ok(None);
    };

    sqlx::query(
        r#"
        UPDATE assets
        SET life_health = $1, economy = $2, ecology = $3, dependency = $4,
            social = $5, international = $6, updated_at = NOW()
        WHERE id = $7
        "#,
    )
    .bind(means.life_health)
    .bind(means.economy)
    .bind(means.ecology)
    .bind(means.dependency)
    .bind(means.social)
    .bind(means.international)
    .bind(asset_id)
    .execute(&mut *conn)
    .await?;

    tracing::info!(%asset_id, evaluations = rows.len(), "Recomputed criterion means");
    Ok(Some(means))
}

/// Recompute the mean threat probability of the asset.
///
/// With no estimates the cached probability is left as it is.
pub async fn recompute_threat_probability(
    conn: &mut PgConnection,
    asset_id: Uuid,
) -> Result<Option<f64>, AppError> {
    let values = sqlx::query_scalar::<_, f64>(
        "SELECT probability FROM threat_probabilities WHERE asset_id = $1",
    )
    .bind(asset_id)
    .fetch_all(&mut *conn)
    .await?;

    let Some(mean) = mean_probability(&values) else {
        tracing::debug!(%asset_id, "No probability estimates; keeping cached probability");
        return Ok(None);
    };

    sqlx::query("UPDATE assets SET threat_probability = $1, updated_at = NOW() WHERE id = $2")
        .bind(mean)
        .bind(asset_id)
        .execute(&mut *conn)
        .await?;

    tracing::info!(%asset_id, estimates = values.len(), "Recomputed threat probability");
    Ok(Some(mean))
}

/// Apply a change inside the caller's transaction.
pub async fn apply(conn: &mut PgConnection, change: &AssetChange) -> Result<(), AppError> {
    lock_asset(conn, change.asset_id).await?;
    match change.source {
        ScoreSource::Evaluations => {
            recompute_asset_scores(conn, change.asset_id).await?;
        }
        ScoreSource::ThreatProbabilities => {
            recompute_threat_probability(conn, change.asset_id).await?;
        }
    }
    Ok(())
}

/// Recompute both means of one asset in a transaction of its own.
///
/// Safe to call redundantly: the result only depends on the stored rows.
pub async fn recompute_all(pool: &PgPool, asset_id: Uuid) -> Result<RecomputeOutcome, AppError> {
    let mut tx = pool.begin().await?;
    lock_asset(&mut tx, asset_id).await?;
    let scores = recompute_asset_scores(&mut tx, asset_id).await?;
    let threat_probability = recompute_threat_probability(&mut tx, asset_id).await?;
    tx.commit().await?;

    Ok(RecomputeOutcome {
        asset_id,
        scores,
        threat_probability,
    })
}

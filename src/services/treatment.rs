//! Risk treatment service.
//!
//! Treatments are addressed by their own id. Control fields are cleared
//! for every strategy other than mitigation before any write.

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::treatment::{CreateRiskTreatment, RiskTreatment, RiskTreatmentDetail, TreatmentPlan};

/// All treatments joined with reference names, oldest first.
pub async fn list_details<'e>(
    executor: impl PgExecutor<'e>,
) -> Result<Vec<RiskTreatmentDetail>, AppError> {
    let rows = sqlx::query_as::<_, RiskTreatmentDetail>(
        r#"
        SELECT rt.id, rt.asset_id, a.name AS asset_name, o.name AS owner, t.name AS threat,
               v.name AS vulnerability, v.category AS vulnerability_category,
               rt.strategy, cm.name AS control_measure, rt.control_effectiveness
        FROM risk_treatments rt
        JOIN assets a ON a.id = rt.asset_id
        JOIN asset_owners o ON o.id = rt.asset_owner_id
        JOIN threats t ON t.id = rt.threat_id
        JOIN vulnerabilities v ON v.id = rt.vulnerability_id
        LEFT JOIN control_measures cm ON cm.id = rt.control_measure_id
        ORDER BY rt.created_at, rt.id
        "#,
    )
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<RiskTreatment, AppError> {
    sqlx::query_as::<_, RiskTreatment>("SELECT * FROM risk_treatments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Risk treatment {id} not found")))
}

pub async fn create(pool: &PgPool, input: &CreateRiskTreatment) -> Result<RiskTreatment, AppError> {
    input.validate()?;
    let plan = input.plan.clone().normalized();

    let treatment = sqlx::query_as::<_, RiskTreatment>(
        r#"
        INSERT INTO risk_treatments (asset_id, asset_owner_id, threat_id, vulnerability_id,
            strategy, control_measure_id, control_effectiveness)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(input.asset_id)
    .bind(input.asset_owner_id)
    .bind(input.threat_id)
    .bind(input.vulnerability_id)
    .bind(plan.strategy)
    .bind(plan.control_measure_id)
    .bind(plan.control_effectiveness)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Risk treatment already exists"))?;

    tracing::info!(treatment_id = %treatment.id, asset_id = %treatment.asset_id, strategy = ?treatment.strategy, "Risk treatment created");
    Ok(treatment)
}

/// Replace every field of a treatment, keeping its id and creation time so
/// it holds its position in the report.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &CreateRiskTreatment,
) -> Result<RiskTreatment, AppError> {
    input.validate()?;
    let plan = input.plan.clone().normalized();

    let treatment = sqlx::query_as::<_, RiskTreatment>(
        r#"
        UPDATE risk_treatments
        SET asset_id = $1, asset_owner_id = $2, threat_id = $3, vulnerability_id = $4,
            strategy = $5, control_measure_id = $6, control_effectiveness = $7,
            updated_at = NOW()
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(input.asset_id)
    .bind(input.asset_owner_id)
    .bind(input.threat_id)
    .bind(input.vulnerability_id)
    .bind(plan.strategy)
    .bind(plan.control_measure_id)
    .bind(plan.control_effectiveness)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Risk treatment already exists"))?
    .ok_or_else(|| AppError::NotFound(format!("Risk treatment {id} not found")))?;

    tracing::info!(treatment_id = %id, asset_id = %treatment.asset_id, strategy = ?treatment.strategy, "Risk treatment updated");
    Ok(treatment)
}

/// Replace the strategy and control choice of one treatment.
pub async fn update_plan(
    pool: &PgPool,
    id: Uuid,
    plan: &TreatmentPlan,
) -> Result<RiskTreatment, AppError> {
    plan.validate()?;
    let plan = plan.clone().normalized();

    sqlx::query_as::<_, RiskTreatment>(
        r#"
        UPDATE risk_treatments
        SET strategy = $1, control_measure_id = $2, control_effectiveness = $3, updated_at = NOW()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(plan.strategy)
    .bind(plan.control_measure_id)
    .bind(plan.control_effectiveness)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::from_write(e, "Risk treatment already exists"))?
    .ok_or_else(|| AppError::NotFound(format!("Risk treatment {id} not found")))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM risk_treatments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Risk treatment {id} not found")));
    }
    Ok(())
}

//! Expert registry service.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::expert::{Expert, ExpertInput};

pub async fn list(pool: &PgPool) -> Result<Vec<Expert>, AppError> {
    let experts = sqlx::query_as::<_, Expert>("SELECT * FROM experts ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(experts)
}

pub async fn create(pool: &PgPool, input: &ExpertInput) -> Result<Expert, AppError> {
    input.validate()?;
    sqlx::query_as::<_, Expert>("INSERT INTO experts (name) VALUES ($1) RETURNING *")
        .bind(input.name.trim())
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::from_write(e, format!("Expert '{}' already exists", input.name.trim())))
}

pub async fn rename(pool: &PgPool, id: Uuid, input: &ExpertInput) -> Result<Expert, AppError> {
    input.validate()?;
    sqlx::query_as::<_, Expert>("UPDATE experts SET name = $1 WHERE id = $2 RETURNING *")
        .bind(input.name.trim())
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::from_write(e, format!("Expert '{}' already exists", input.name.trim())))?
        .ok_or_else(|| AppError::NotFound(format!("Expert {id} not found")))
}

/// Delete an expert who has submitted no evaluations or probabilities.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let submitted: i64 = sqlx::query_scalar(
        r#"
        SELECT (SELECT COUNT(*) FROM asset_evaluations WHERE expert_id = $1)
             + (SELECT COUNT(*) FROM threat_probabilities WHERE expert_id = $1)
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    if submitted > 0 {
        return Err(AppError::Conflict(format!(
            "Expert has {submitted} submitted estimate(s)"
        )));
    }

    let result = sqlx::query("DELETE FROM experts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::Conflict("Expert is still referenced".to_string())
            }
            _ => AppError::Database(e),
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Expert {id} not found")));
    }
    Ok(())
}

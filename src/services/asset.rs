//! Asset registry service: CRUD with referential-integrity checks.

use serde::Serialize;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::asset::{Asset, CreateAsset, RenameAsset};

/// Rows that still reference an asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AssetDependents {
    pub evaluations: i64,
    pub probabilities: i64,
    pub treatments: i64,
}

impl AssetDependents {
    pub fn is_empty(&self) -> bool {
        self.evaluations == 0 && self.probabilities == 0 && self.treatments == 0
    }
}

/// Create an asset with every cached mean unset.
pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, AppError> {
    input.validate()?;
    let asset = sqlx::query_as::<_, Asset>("INSERT INTO assets (name) VALUES ($1) RETURNING *")
        .bind(input.name.trim())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            AppError::from_write(e, format!("Asset '{}' already exists", input.name.trim()))
        })?;

    tracing::info!(asset_id = %asset.id, name = %asset.name, "Asset created");
    Ok(asset)
}

/// List assets in creation order.
pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Asset>, AppError> {
    let assets = sqlx::query_as::<_, Asset>("SELECT * FROM assets ORDER BY created_at, name")
        .fetch_all(executor)
        .await?;
    Ok(assets)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Asset, AppError> {
    sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset {id} not found")))
}

/// Rename an asset. The cached means are left untouched.
pub async fn rename(pool: &PgPool, id: Uuid, input: &RenameAsset) -> Result<Asset, AppError> {
    input.validate()?;
    sqlx::query_as::<_, Asset>(
        "UPDATE assets SET name = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(input.name.trim())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::from_write(e, format!("Asset '{}' already exists", input.name.trim())))?
    .ok_or_else(|| AppError::NotFound(format!("Asset {id} not found")))
}

/// Count evaluation, probability and treatment rows referencing the asset.
pub async fn dependents(pool: &PgPool, id: Uuid) -> Result<AssetDependents, AppError> {
    let counts = sqlx::query_as::<_, AssetDependents>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM asset_evaluations WHERE asset_id = $1) AS evaluations,
            (SELECT COUNT(*) FROM threat_probabilities WHERE asset_id = $1) AS probabilities,
            (SELECT COUNT(*) FROM risk_treatments WHERE asset_id = $1) AS treatments
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(counts)
}

/// Delete an asset that nothing references any more.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let counts = dependents(pool, id).await?;
    if !counts.is_empty() {
        return Err(AppError::Conflict(format!(
            "Asset has {} evaluation(s), {} threat probability estimate(s) and {} risk treatment(s)",
            counts.evaluations, counts.probabilities, counts.treatments
        )));
    }

    let result = sqlx::query("DELETE FROM assets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match e {
            // A dependent row was inserted after the count.
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::Conflict("Asset is still referenced".to_string())
            }
            _ => AppError::Database(e),
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Asset {id} not found")));
    }
    tracing::info!(asset_id = %id, "Asset deleted");
    Ok(())
}

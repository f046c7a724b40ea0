//! Reference registries: asset owners, threats, control measures and
//! vulnerabilities.

use sqlx::PgPool;
use validator::Validate;

use crate::errors::AppError;
use crate::models::registry::{
    CreateRegistryEntry, CreateVulnerability, RegistryEntry, RegistryKind, Vulnerability,
};

pub async fn list(pool: &PgPool, kind: RegistryKind) -> Result<Vec<RegistryEntry>, AppError> {
    // Table names come from a closed enum, never from user input.
    let sql = format!("SELECT id, name FROM {} ORDER BY name", kind.table());
    let entries = sqlx::query_as::<_, RegistryEntry>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(entries)
}

pub async fn create(
    pool: &PgPool,
    kind: RegistryKind,
    input: &CreateRegistryEntry,
) -> Result<RegistryEntry, AppError> {
    input.validate()?;
    let name = input.name.trim();
    let sql = format!("INSERT INTO {} (name) VALUES ($1) RETURNING id, name", kind.table());
    sqlx::query_as::<_, RegistryEntry>(&sql)
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::from_write(e, format!("{} '{name}' already exists", kind.label())))
}

pub async fn list_vulnerabilities(pool: &PgPool) -> Result<Vec<Vulnerability>, AppError> {
    let rows = sqlx::query_as::<_, Vulnerability>(
        "SELECT id, name, category FROM vulnerabilities ORDER BY category, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_vulnerability(
    pool: &PgPool,
    input: &CreateVulnerability,
) -> Result<Vulnerability, AppError> {
    input.validate()?;
    sqlx::query_as::<_, Vulnerability>(
        "INSERT INTO vulnerabilities (name, category) VALUES ($1, $2) RETURNING id, name, category",
    )
    .bind(input.name.trim())
    .bind(input.category.trim())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        AppError::from_write(e, format!("Vulnerability '{}' already exists", input.name.trim()))
    })
}

//! Risk report: reads the fact base and runs the ranking pipeline.
//!
//! Every request recomputes from one read-only snapshot of the fact base;
//! nothing derived here is stored.

use serde::Serialize;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::config::BandPalette;
use crate::errors::AppError;
use crate::models::asset::Asset;
use crate::models::criteria::CriteriaWeights;
use crate::models::treatment::RiskTreatmentDetail;
use crate::services::ranking::{self, ChartData, RankedRisk, TreatmentReportRow};
use crate::services::{asset, treatment};

/// Column names of the CSV export, in `RankedRisk` field order.
pub const CSV_HEADER: [&str; 10] = [
    "rank",
    "asset_id",
    "asset_name",
    "criticality",
    "impact",
    "likelihood",
    "inherent_risk",
    "residual_risk",
    "band",
    "interpretation",
];

/// Shown in place of an empty report or chart.
pub const NO_DATA_NOTICE: &str =
    "No asset has complete evaluation and threat probability data.";

#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub weights: CriteriaWeights,
    pub ranked: Vec<RankedRisk>,
    pub treatments: Vec<TreatmentReportRow>,
    pub notice: Option<&'static str>,
}

/// Chart payload for the external renderer.
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub available: bool,
    pub chart: Option<ChartData>,
    pub notice: Option<&'static str>,
}

/// Load and validate the singleton criteria weights.
pub async fn load_weights<'e>(executor: impl PgExecutor<'e>) -> Result<CriteriaWeights, AppError> {
    let weights = sqlx::query_as::<_, CriteriaWeights>(
        r#"
        SELECT life_health, economy, ecology, dependency, social, international
        FROM criteria_weights
        "#,
    )
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::Internal("Criteria weights are not configured".to_string()))?;

    weights
        .validate()
        .map_err(|e| AppError::Internal(format!("Stored criteria weights are invalid: {e}")))?;
    Ok(weights)
}

/// Rank the given snapshot and join the treatment registry onto it.
pub fn assemble(
    assets: &[Asset],
    weights: CriteriaWeights,
    treatments: &[RiskTreatmentDetail],
) -> RiskReport {
    let ranked = ranking::build_report(assets, &weights, treatments);
    let joined = ranking::join_treatments(&ranked, treatments);
    let notice = ranked.is_empty().then_some(NO_DATA_NOTICE);

    RiskReport {
        weights,
        ranked,
        treatments: joined,
        notice,
    }
}

/// Open a read-only transaction that sees one consistent snapshot.
///
/// Writes committed after the first query are invisible to every later
/// query on the same transaction.
pub async fn begin_snapshot(pool: &PgPool) -> Result<Transaction<'static, Postgres>, AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Build the full report from the current database state.
pub async fn build(pool: &PgPool) -> Result<RiskReport, AppError> {
    let mut tx = begin_snapshot(pool).await?;
    let weights = load_weights(&mut *tx).await?;
    let assets = asset::list(&mut *tx).await?;
    let treatments = treatment::list_details(&mut *tx).await?;
    tx.commit().await?;

    let report = assemble(&assets, weights, &treatments);
    tracing::info!(
        assets = assets.len(),
        incomplete = assets.iter().filter(|a| !a.is_complete()).count(),
        ranked = report.ranked.len(),
        treatments = report.treatments.len(),
        "Risk report built"
    );
    Ok(report)
}

/// Wrap ranked risks into the chart contract.
pub fn chart_view(ranked: &[RankedRisk], palette: &BandPalette) -> ChartView {
    match ranking::chart_data(ranked, palette) {
        Some(chart) => ChartView {
            available: true,
            chart: Some(chart),
            notice: None,
        },
        None => ChartView {
            available: false,
            chart: None,
            notice: Some(NO_DATA_NOTICE),
        },
    }
}

pub async fn chart(pool: &PgPool, palette: &BandPalette) -> Result<ChartView, AppError> {
    let report = build(pool).await?;
    Ok(chart_view(&report.ranked, palette))
}

/// Ranked rows as CSV. The header line is written even when `ranked` is
/// empty.
pub fn to_csv(ranked: &[RankedRisk]) -> Result<String, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::Internal(format!("CSV serialization failed: {e}")))?;
    for risk in ranked {
        writer
            .serialize(risk)
            .map_err(|e| AppError::Internal(format!("CSV serialization failed: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV is not UTF-8: {e}")))
}

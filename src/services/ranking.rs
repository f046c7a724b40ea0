//! Ranking of assets by criticality and assembly of the report views.
//!
//! Pure functions over already-loaded rows; the report service does the
//! database reads and hands the results here.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::config::BandPalette;
use crate::models::asset::Asset;
use crate::models::criteria::CriteriaWeights;
use crate::models::registry::Vulnerability;
use crate::models::treatment::{RiskTreatmentDetail, TreatmentStrategy};
use crate::services::criticality;
use crate::services::risk_engine::{self, RiskBand};

/// One asset's position in the risk ranking. Figures are rounded to two
/// decimals; the band is classified on the unrounded residual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRisk {
    pub rank: usize,
    pub asset_id: Uuid,
    pub asset_name: String,
    pub criticality: f64,
    pub impact: f64,
    pub likelihood: f64,
    pub inherent_risk: f64,
    pub residual_risk: f64,
    pub band: RiskBand,
    pub interpretation: &'static str,
}

/// A risk treatment joined with the computed risk of its asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentReportRow {
    pub position: usize,
    pub treatment_id: Uuid,
    pub asset_id: Uuid,
    pub asset_name: String,
    pub owner: String,
    pub threat: String,
    pub vulnerability_with_category: String,
    pub impact: f64,
    pub likelihood: f64,
    pub inherent_risk: f64,
    pub treatment_strategy: TreatmentStrategy,
    pub control_measure: Option<String>,
    pub control_effectiveness: f64,
    pub residual_risk: f64,
}

/// One point for the external risk matrix renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub asset_name: String,
    pub impact: f64,
    pub residual_risk: f64,
}

/// Colour and score interval of one band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandColor {
    pub band: RiskBand,
    pub color: String,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub points: Vec<ChartPoint>,
    pub bands: Vec<BandColor>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Control effectiveness per asset, taken from the first treatment listed
/// for it. Assets without a treatment are absent (treated as 0).
pub fn control_lookup(treatments: &[RiskTreatmentDetail]) -> HashMap<Uuid, f64> {
    let mut lookup = HashMap::new();
    for treatment in treatments {
        lookup
            .entry(treatment.asset_id)
            .or_insert_with(|| treatment.effective_control());
    }
    lookup
}

/// Score every complete asset and rank by criticality, highest first.
///
/// Assets with any mean or the threat probability unset are skipped. The
/// sort is stable, so equal criticalities keep the order of `assets`.
pub fn build_report(
    assets: &[Asset],
    weights: &CriteriaWeights,
    treatments: &[RiskTreatmentDetail],
) -> Vec<RankedRisk> {
    let controls = control_lookup(treatments);

    let mut ranked: Vec<RankedRisk> = assets
        .iter()
        .filter_map(|asset| {
            let scores = asset.mean_scores()?;
            let likelihood = asset.threat_probability?;

            let criticality = criticality::criticality(&scores, weights);
            let impact = criticality::impact(criticality);
            let effectiveness = controls.get(&asset.id).copied().unwrap_or(0.0);
            let risk = risk_engine::score(impact, likelihood, Some(effectiveness));

            Some(RankedRisk {
                rank: 0,
                asset_id: asset.id,
                asset_name: asset.name.clone(),
                criticality: round2(criticality),
                impact: round2(impact),
                likelihood: round2(likelihood),
                inherent_risk: round2(risk.inherent),
                residual_risk: round2(risk.residual),
                band: risk.band,
                interpretation: risk.interpretation,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.criticality.total_cmp(&a.criticality));
    for (index, risk) in ranked.iter_mut().enumerate() {
        risk.rank = index + 1;
    }
    ranked
}

/// Attach each treatment to its asset's ranked risk. Treatments whose asset
/// is not ranked are dropped; `position` keeps the treatment's place in the
/// full list.
pub fn join_treatments(
    ranked: &[RankedRisk],
    treatments: &[RiskTreatmentDetail],
) -> Vec<TreatmentReportRow> {
    let by_asset: HashMap<Uuid, &RankedRisk> =
        ranked.iter().map(|risk| (risk.asset_id, risk)).collect();

    treatments
        .iter()
        .enumerate()
        .filter_map(|(index, treatment)| {
            let risk = by_asset.get(&treatment.asset_id)?;
            Some(TreatmentReportRow {
                position: index + 1,
                treatment_id: treatment.id,
                asset_id: treatment.asset_id,
                asset_name: treatment.asset_name.clone(),
                owner: treatment.owner.clone(),
                threat: treatment.threat.clone(),
                vulnerability_with_category: Vulnerability::display_name(
                    &treatment.vulnerability_category,
                    &treatment.vulnerability,
                ),
                impact: risk.impact,
                likelihood: risk.likelihood,
                inherent_risk: risk.inherent_risk,
                treatment_strategy: treatment.strategy,
                control_measure: treatment.control_measure.clone(),
                control_effectiveness: treatment.effective_control(),
                residual_risk: risk.residual_risk,
            })
        })
        .collect()
}

/// Chart points in rank order, produced on demand.
pub fn chart_points(ranked: &[RankedRisk]) -> impl Iterator<Item = ChartPoint> + '_ {
    ranked.iter().map(|risk| ChartPoint {
        asset_name: risk.asset_name.clone(),
        impact: risk.impact,
        residual_risk: risk.residual_risk,
    })
}

/// Band colour mapping for the renderer.
pub fn band_colors(palette: &BandPalette) -> Vec<BandColor> {
    RiskBand::ALL
        .iter()
        .map(|band| {
            let color = match band {
                RiskBand::Low => &palette.low,
                RiskBand::Medium => &palette.medium,
                RiskBand::High => &palette.high,
            };
            let (lower, upper) = band.bounds();
            BandColor {
                band: *band,
                color: color.clone(),
                lower,
                upper,
            }
        })
        .collect()
}

/// Everything an external renderer needs, or `None` when nothing is ranked.
pub fn chart_data(ranked: &[RankedRisk], palette: &BandPalette) -> Option<ChartData> {
    if ranked.is_empty() {
        return None;
    }
    Some(ChartData {
        points: chart_points(ranked).collect(),
        bands: band_colors(palette),
    })
}

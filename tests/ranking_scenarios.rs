//! End-to-end ranking scenarios over in-memory rows: expert estimates are
//! aggregated into asset means, then scored, banded and ranked.
//!
//! No database required. Run with: `cargo test --test ranking_scenarios`

use chrono::Utc;
use riskmatrix::models::asset::Asset;
use riskmatrix::models::criteria::{CriteriaWeights, CriterionScores};
use riskmatrix::models::treatment::{RiskTreatmentDetail, TreatmentStrategy};
use riskmatrix::services::aggregation::{mean_probability, mean_scores};
use riskmatrix::services::ranking::{build_report, join_treatments};
use riskmatrix::services::report::{assemble, to_csv, CSV_HEADER, NO_DATA_NOTICE};
use riskmatrix::services::risk_engine::RiskBand;
use uuid::Uuid;

/// Asset whose cached means come from the given expert estimates.
fn aggregated_asset(name: &str, evaluations: &[CriterionScores], probabilities: &[f64]) -> Asset {
    let means = mean_scores(evaluations);
    let now = Utc::now();
    Asset {
        id: Uuid::new_v4(),
        name: name.to_string(),
        life_health: means.map(|m| m.life_health),
        economy: means.map(|m| m.economy),
        ecology: means.map(|m| m.ecology),
        dependency: means.map(|m| m.dependency),
        social: means.map(|m| m.social),
        international: means.map(|m| m.international),
        threat_probability: mean_probability(probabilities),
        created_at: now,
        updated_at: now,
    }
}

fn uniform_asset(name: &str, score: f64, probability: f64) -> Asset {
    aggregated_asset(name, &[CriterionScores::uniform(score)], &[probability])
}

fn treatment(asset: &Asset, strategy: TreatmentStrategy, effectiveness: Option<f64>) -> RiskTreatmentDetail {
    RiskTreatmentDetail {
        id: Uuid::new_v4(),
        asset_id: asset.id,
        asset_name: asset.name.clone(),
        owner: "IT Department".to_string(),
        threat: "Ransomware infection".to_string(),
        vulnerability: "Unpatched operating system".to_string(),
        vulnerability_category: "Software".to_string(),
        strategy,
        control_measure: effectiveness.map(|_| "A.12.2.1 Controls against malware".to_string()),
        control_effectiveness: effectiveness,
    }
}

#[test]
fn maximum_scores_without_controls_rank_high() {
    let assets = [uniform_asset("Core banking database", 10.0, 3.0)];
    let report = build_report(&assets, &CriteriaWeights::default(), &[]);

    assert_eq!(report.len(), 1);
    let risk = &report[0];
    assert_eq!(risk.rank, 1);
    assert_eq!(risk.criticality, 10.0);
    assert_eq!(risk.impact, 3.0);
    assert_eq!(risk.inherent_risk, 9.0);
    assert_eq!(risk.residual_risk, 9.0);
    assert_eq!(risk.band, RiskBand::High);
    assert_eq!(risk.interpretation, "Requires priority remediation.");
}

#[test]
fn half_effective_control_brings_maximum_risk_to_medium() {
    let asset = uniform_asset("Core banking database", 10.0, 3.0);
    let treatments = [treatment(&asset, TreatmentStrategy::Mitigate, Some(0.5))];
    let report = build_report(&[asset], &CriteriaWeights::default(), &treatments);

    assert_eq!(report[0].inherent_risk, 9.0);
    assert_eq!(report[0].residual_risk, 4.5);
    assert_eq!(report[0].band, RiskBand::Medium);
    assert_eq!(report[0].interpretation, "Requires mitigating action.");
}

#[test]
fn expert_estimates_are_averaged_before_scoring() {
    let asset = aggregated_asset(
        "Customer web portal",
        &[CriterionScores::uniform(10.0), CriterionScores::uniform(6.0)],
        &[3.0, 1.0],
    );
    let report = build_report(&[asset], &CriteriaWeights::default(), &[]);

    assert_eq!(report[0].criticality, 8.0);
    assert_eq!(report[0].impact, 2.6);
    assert_eq!(report[0].likelihood, 2.0);
    assert_eq!(report[0].inherent_risk, 5.2);
    assert_eq!(report[0].band, RiskBand::Medium);
}

#[test]
fn incomplete_assets_are_left_out() {
    let complete = uniform_asset("Complete", 5.0, 2.0);
    let no_probability = aggregated_asset("No probability", &[CriterionScores::uniform(9.0)], &[]);
    let no_evaluations = aggregated_asset("No evaluations", &[], &[3.0]);

    let report = build_report(
        &[no_probability, complete, no_evaluations],
        &CriteriaWeights::default(),
        &[],
    );

    let names: Vec<&str> = report.iter().map(|r| r.asset_name.as_str()).collect();
    assert_eq!(names, ["Complete"]);
}

#[test]
fn ties_keep_input_order_and_ranks_are_positional() {
    let assets = [
        uniform_asset("A", 5.0, 2.0),
        uniform_asset("B", 5.0, 2.0),
        uniform_asset("C", 9.0, 2.0),
    ];
    let report = build_report(&assets, &CriteriaWeights::default(), &[]);

    let order: Vec<(usize, &str)> = report
        .iter()
        .map(|r| (r.rank, r.asset_name.as_str()))
        .collect();
    assert_eq!(order, [(1, "C"), (2, "A"), (3, "B")]);
}

#[test]
fn treatment_rows_follow_their_assets() {
    let ranked_asset = uniform_asset("Ranked", 10.0, 3.0);
    let unranked_asset = aggregated_asset("Unranked", &[], &[]);
    let treatments = [
        treatment(&unranked_asset, TreatmentStrategy::Accept, None),
        treatment(&ranked_asset, TreatmentStrategy::Mitigate, Some(0.5)),
        treatment(&ranked_asset, TreatmentStrategy::Transfer, None),
    ];

    let ranked = build_report(&[ranked_asset, unranked_asset], &CriteriaWeights::default(), &treatments);
    let rows = join_treatments(&ranked, &treatments);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].position, 2);
    assert_eq!(rows[0].vulnerability_with_category, "Software: Unpatched operating system");
    assert_eq!(rows[0].control_effectiveness, 0.5);
    assert_eq!(rows[0].residual_risk, 4.5);

    // The transfer row shows the asset's residual, driven by the first treatment.
    assert_eq!(rows[1].treatment_strategy, TreatmentStrategy::Transfer);
    assert_eq!(rows[1].control_effectiveness, 0.0);
    assert_eq!(rows[1].control_measure, None);
    assert_eq!(rows[1].residual_risk, 4.5);
}

#[test]
fn empty_register_yields_notice_and_header_only_csv() {
    let report = assemble(&[], CriteriaWeights::default(), &[]);
    assert_eq!(report.notice, Some(NO_DATA_NOTICE));

    let csv = to_csv(&report.ranked).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines, [CSV_HEADER.join(",")]);
}

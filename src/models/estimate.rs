//! Per-expert estimates: criterion evaluations and threat probabilities.
//!
//! Each (asset, expert) pair holds at most one estimate of each kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::criteria::CriterionScores;

/// One expert's scores for one asset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Evaluation {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub expert_id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub scores: CriterionScores,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Evaluation joined with asset and expert names for list views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EvaluationSummary {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub asset_name: String,
    pub expert_id: Uuid,
    pub expert_name: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub scores: CriterionScores,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEvaluation {
    pub asset_id: Uuid,
    pub expert_id: Uuid,
    #[serde(flatten)]
    #[validate(nested)]
    pub scores: CriterionScores,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateEvaluation {
    #[serde(flatten)]
    #[validate(nested)]
    pub scores: CriterionScores,
}

/// One expert's likelihood estimate (1 = unlikely, 3 = likely) for one asset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ThreatProbability {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub expert_id: Uuid,
    pub probability: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ThreatProbabilitySummary {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub asset_name: String,
    pub expert_id: Uuid,
    pub expert_name: String,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateThreatProbability {
    pub asset_id: Uuid,
    pub expert_id: Uuid,
    #[validate(range(min = 1.0, max = 3.0))]
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateThreatProbability {
    #[validate(range(min = 1.0, max = 3.0))]
    pub probability: f64,
}

/// Filters shared by the evaluation and probability list endpoints.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EstimateFilters {
    pub asset_id: Option<Uuid>,
    pub expert_id: Option<Uuid>,
}

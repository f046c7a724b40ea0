//! Risk treatment registry: how each identified risk on an asset is handled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "treatment_strategy")]
pub enum TreatmentStrategy {
    /// Reduce the risk by applying a control measure.
    Mitigate,
    /// Hand the risk to a third party, e.g. insurance.
    Transfer,
    /// Stop the activity that causes the risk.
    Avoid,
    /// Keep the risk as is.
    Accept,
}

impl TreatmentStrategy {
    /// Only mitigation carries a control measure and effectiveness.
    pub fn allows_controls(&self) -> bool {
        matches!(self, Self::Mitigate)
    }
}

impl std::fmt::Display for TreatmentStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mitigate => write!(f, "Mitigate risk and select controls"),
            Self::Transfer => write!(f, "Transfer risk to a third party"),
            Self::Avoid => write!(f, "Avoid risk"),
            Self::Accept => write!(f, "Accept risk"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RiskTreatment {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub asset_owner_id: Uuid,
    pub threat_id: Uuid,
    pub vulnerability_id: Uuid,
    pub strategy: TreatmentStrategy,
    pub control_measure_id: Option<Uuid>,
    pub control_effectiveness: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Treatment joined with every reference name it points at.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RiskTreatmentDetail {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub asset_name: String,
    pub owner: String,
    pub threat: String,
    pub vulnerability: String,
    pub vulnerability_category: String,
    pub strategy: TreatmentStrategy,
    pub control_measure: Option<String>,
    pub control_effectiveness: Option<f64>,
}

impl RiskTreatmentDetail {
    /// Fraction of risk neutralised by this treatment; zero unless mitigating.
    pub fn effective_control(&self) -> f64 {
        if self.strategy.allows_controls() {
            self.control_effectiveness.unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

/// Strategy and control choice for a treatment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct TreatmentPlan {
    pub strategy: TreatmentStrategy,
    pub control_measure_id: Option<Uuid>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub control_effectiveness: Option<f64>,
}

impl TreatmentPlan {
    /// Clear the control fields for any strategy other than mitigation.
    pub fn normalized(mut self) -> Self {
        if !self.strategy.allows_controls() {
            self.control_measure_id = None;
            self.control_effectiveness = None;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRiskTreatment {
    pub asset_id: Uuid,
    pub asset_owner_id: Uuid,
    pub threat_id: Uuid,
    pub vulnerability_id: Uuid,
    #[serde(flatten)]
    #[validate(nested)]
    pub plan: TreatmentPlan,
}

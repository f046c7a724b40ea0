//! Asset registry model with cached per-criterion means.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::criteria::CriterionScores;

/// An assessed asset. The mean columns are written only by the
/// aggregation service and stay `None` until the first estimate arrives.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub life_health: Option<f64>,
    pub economy: Option<f64>,
    pub ecology: Option<f64>,
    pub dependency: Option<f64>,
    pub social: Option<f64>,
    pub international: Option<f64>,
    pub threat_probability: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Mean criterion vector, only when all six means are populated.
    pub fn mean_scores(&self) -> Option<CriterionScores> {
        Some(CriterionScores {
            life_health: self.life_health?,
            economy: self.economy?,
            ecology: self.ecology?,
            dependency: self.dependency?,
            social: self.social?,
            international: self.international?,
        })
    }

    /// Whether the asset has everything needed to appear in the report.
    pub fn is_complete(&self) -> bool {
        self.mean_scores().is_some() && self.threat_probability.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameAsset {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Asset with every mean set to `score` and the given probability.
    pub fn scored_asset(name: &str, score: f64, probability: f64) -> Asset {
        let now = Utc::now();
        Asset {
            id: Uuid::new_v4(),
            name: name.to_string(),
            life_health: Some(score),
            economy: Some(score),
            ecology: Some(score),
            dependency: Some(score),
            social: Some(score),
            international: Some(score),
            threat_probability: Some(probability),
            created_at: now,
            updated_at: now,
        }
    }
}

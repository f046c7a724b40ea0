//! The six impact criteria: per-expert scores and the fixed weight vector.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::errors::AppError;

/// Number of impact criteria every evaluation covers.
pub const CRITERIA_COUNT: usize = 6;

/// Tolerance applied when checking that the weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Scores for the six impact criteria, each on a 0-10 scale.
///
/// Used both for one expert's evaluation and for an asset's mean vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct CriterionScores {
    #[validate(range(min = 0.0, max = 10.0))]
    pub life_health: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub economy: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub ecology: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub dependency: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub social: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub international: f64,
}

impl CriterionScores {
    /// Same score on every criterion.
    pub fn uniform(score: f64) -> Self {
        Self::from_array([score; CRITERIA_COUNT])
    }

    pub fn from_array(values: [f64; CRITERIA_COUNT]) -> Self {
        let [life_health, economy, ecology, dependency, social, international] = values;
        Self {
            life_health,
            economy,
            ecology,
            dependency,
            social,
            international,
        }
    }

    /// Criteria in canonical order.
    pub fn to_array(&self) -> [f64; CRITERIA_COUNT] {
        [
            self.life_health,
            self.economy,
            self.ecology,
            self.dependency,
            self.social,
            self.international,
        ]
    }
}

/// Relative importance of each criterion. Loaded from the singleton
/// `criteria_weights` row and passed explicitly to the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CriteriaWeights {
    pub life_health: f64,
    pub economy: f64,
    pub ecology: f64,
    pub dependency: f64,
    pub social: f64,
    pub international: f64,
}

impl Default for CriteriaWeights {
    fn default() -> Self {
        Self {
            life_health: 0.419,
            economy: 0.252,
            ecology: 0.099,
            dependency: 0.144,
            social: 0.051,
            international: 0.035,
        }
    }
}

impl CriteriaWeights {
    /// Criteria in canonical order.
    pub fn to_array(&self) -> [f64; CRITERIA_COUNT] {
        [
            self.life_health,
            self.economy,
            self.ecology,
            self.dependency,
            self.social,
            self.international,
        ]
    }

    /// Enforce the weight invariant: non-negative, finite, summing to 1.0.
    pub fn validate(&self) -> Result<(), AppError> {
        let weights = self.to_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(AppError::Validation(
                "Criteria weights must be finite and non-negative".to_string(),
            ));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AppError::Validation(format!(
                "Criteria weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        assert!(CriteriaWeights::default().validate().is_ok());
    }

    #[test]
    fn weights_not_summing_to_one_are_rejected() {
        let weights = CriteriaWeights {
            life_health: 0.5,
            ..CriteriaWeights::default()
        };
        assert!(matches!(weights.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let weights = CriteriaWeights {
            life_health: 0.519,
            economy: -0.1,
            ecology: 0.199,
            dependency: 0.144,
            social: 0.151,
            international: 0.087,
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn scores_outside_scale_fail_validation() {
        let mut scores = CriterionScores::uniform(5.0);
        assert!(scores.validate().is_ok());
        scores.ecology = 10.5;
        assert!(scores.validate().is_err());
        scores.ecology = -0.1;
        assert!(scores.validate().is_err());
    }

    #[test]
    fn array_order_is_canonical() {
        let scores = CriterionScores::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(scores.life_health, 1.0);
        assert_eq!(scores.international, 6.0);
        assert_eq!(scores.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}

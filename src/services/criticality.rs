//! Criticality index and impact magnitude.
//!
//! Criticality is the weighted sum of an asset's mean criterion scores
//! (0-10). Impact rescales it onto the 1-3 likelihood scale so that
//! `impact × likelihood` lands in 1-9.

use crate::models::criteria::{CriteriaWeights, CriterionScores};

pub const IMPACT_MIN: f64 = 1.0;
pub const IMPACT_MAX: f64 = 3.0;

const CRITICALITY_SCALE: f64 = 10.0;

/// Dot product of mean scores and weights.
pub fn criticality(scores: &CriterionScores, weights: &CriteriaWeights) -> f64 {
    scores
        .to_array()
        .iter()
        .zip(weights.to_array())
        .map(|(score, weight)| score * weight)
        .sum()
}

/// Linear rescale of criticality from [0, 10] onto [1, 3].
pub fn impact(criticality: f64) -> f64 {
    IMPACT_MIN + (criticality / CRITICALITY_SCALE) * (IMPACT_MAX - IMPACT_MIN)
}

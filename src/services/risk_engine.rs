//! Inherent and residual risk scoring with fixed band thresholds.
//!
//! Risk = impact (1-3) × likelihood (1-3), so scores range 1-9:
//! - Low: 1.0 – 3.9
//! - Medium: 4.0 – 6.9
//! - High: everything else
//!
//! Classification is applied to the residual score after control
//! effectiveness is deducted.

use serde::{Deserialize, Serialize};

/// Upper bound of the Low band.
pub const LOW_MAX: f64 = 3.9;
/// Lower bound of the Medium band.
pub const MEDIUM_MIN: f64 = 4.0;
/// Upper bound of the Medium band.
pub const MEDIUM_MAX: f64 = 6.9;
/// Smallest score an unmitigated risk can have.
pub const RISK_FLOOR: f64 = 1.0;
/// Largest score any risk can have.
pub const RISK_CEILING: f64 = 9.0;

/// Risk band derived from the residual score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Classify a residual score.
    ///
    /// Values below 1.0 (including 0.0 for a fully mitigated risk) and the
    /// gaps between bands fall through to `High`.
    pub fn classify(residual: f64) -> Self {
        if (RISK_FLOOR..=LOW_MAX).contains(&residual) {
            Self::Low
        } else if (MEDIUM_MIN..=MEDIUM_MAX).contains(&residual) {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            Self::Low => "Acceptable, monitor.",
            Self::Medium => "Requires mitigating action.",
            Self::High => "Requires priority remediation.",
        }
    }

    /// Score interval a renderer should paint in this band's colour.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Low => (RISK_FLOOR, LOW_MAX),
            Self::Medium => (LOW_MAX, MEDIUM_MAX),
            Self::High => (MEDIUM_MAX, RISK_CEILING),
        }
    }

    pub const ALL: [RiskBand; 3] = [Self::Low, Self::Medium, Self::High];
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Computed risk for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskScore {
    pub inherent: f64,
    pub residual: f64,
    pub band: RiskBand,
    pub interpretation: &'static str,
}

/// Score a risk from impact, likelihood and optional control effectiveness.
///
/// `control_effectiveness` is the fraction of risk neutralised, in [0, 1].
/// Inputs are assumed to be validated at entry.
pub fn score(impact: f64, likelihood: f64, control_effectiveness: Option<f64>) -> RiskScore {
    let inherent = impact * likelihood;
    let residual = match control_effectiveness {
        Some(effectiveness) => inherent * (1.0 - effectiveness),
        None => inherent,
    };
    let band = RiskBand::classify(residual);

    RiskScore {
        inherent,
        residual,
        band,
        interpretation: band.interpretation(),
    }
}

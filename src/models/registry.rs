//! Reference registries consumed by risk treatments.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Name-only reference tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryKind {
    AssetOwners,
    Threats,
    ControlMeasures,
}

impl RegistryKind {
    pub fn table(&self) -> &'static str {
        match self {
            Self::AssetOwners => "asset_owners",
            Self::Threats => "threats",
            Self::ControlMeasures => "control_measures",
        }
    }

    /// Singular label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AssetOwners => "Asset owner",
            Self::Threats => "Threat",
            Self::ControlMeasures => "Control measure",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct RegistryEntry {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRegistryEntry {
    #[validate(length(min = 1, max = 300))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Vulnerability {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

impl Vulnerability {
    /// "category: name", the form shown in treatment reports.
    pub fn display_name(category: &str, name: &str) -> String {
        format!("{category}: {name}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVulnerability {
    #[validate(length(min = 1, max = 300))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
}

use std::env;

use serde::Serialize;

/// Colours handed to the external chart renderer, one per risk band.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BandPalette {
    pub low: String,
    pub medium: String,
    pub high: String,
}

impl Default for BandPalette {
    fn default() -> Self {
        Self {
            low: "#4CAF50".to_string(),
            medium: "#FFC107".to_string(),
            high: "#F44336".to_string(),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub palette: BandPalette,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = BandPalette::default();
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            palette: BandPalette {
                low: env::var("RISK_COLOR_LOW").unwrap_or(defaults.low),
                medium: env::var("RISK_COLOR_MEDIUM").unwrap_or(defaults.medium),
                high: env::var("RISK_COLOR_HIGH").unwrap_or(defaults.high),
            },
        })
    }
}

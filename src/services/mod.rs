//! Business logic services.

pub mod aggregation;
pub mod asset;
pub mod criticality;
pub mod estimate;
pub mod expert;
pub mod ranking;
pub mod registry;
pub mod report;
pub mod risk_engine;
pub mod treatment;

//! Database models and DTOs for all domain entities.

pub mod asset;
pub mod criteria;
pub mod estimate;
pub mod expert;
pub mod registry;
pub mod treatment;

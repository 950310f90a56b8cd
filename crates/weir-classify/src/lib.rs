//! weir-classify: complexity-domain classification for work items.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` values; derivations themselves never fail.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod effort;
pub mod engine;
pub mod profile;

pub use effort::{total_load, weighted_load};
pub use engine::{
    Classification, ClassificationConflict, apply_classification, classify, default_paradigm,
    is_compatible,
};
pub use profile::{DomainProfile, MAX_LOAD, PROFILES, profile};

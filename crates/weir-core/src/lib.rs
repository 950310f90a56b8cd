//! weir-core: canonical work item model, lifecycle state machine, operation
//! tracking, and the pluggable item store.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums per module; `anyhow::Result` at
//!   config/file boundaries.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod track;
pub mod workflow;

pub use error::ErrorCode;
pub use model::{Comment, CynefinDomain, ItemId, ItemType, Priority, State, WorkItem, WorkParadigm};
pub use store::{ItemStore, MemoryStore, StoreError};
pub use track::{
    OperationFilter, OperationHandle, OperationId, OperationKind, OperationRecord,
    OperationStatus, OperationSummary, OperationTracker, TrackError,
};
pub use workflow::{TransitionError, transition};

//! weir-map: the external representation of a work item, the versioned
//! enumeration tables between it and the canonical model, the bidirectional
//! mapper, and the service facade callers consume.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums; conversion problems degrade to
//!   warnings, only structural problems fail.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod external;
pub mod mapper;
pub mod service;
pub mod tables;

pub use external::{ExternalItem, ExternalPriority, ExternalState, ExternalType};
pub use mapper::{EXT_KEY_PREFIX, MappingError, MappingWarning, map_in, map_out};
pub use service::{BulkOutcome, Service, ServiceError, SubmitOutcome};
pub use tables::TABLES_VERSION;

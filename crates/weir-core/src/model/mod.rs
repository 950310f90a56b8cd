//! Canonical data model: the work item aggregate and its vocabularies.

pub mod comment;
pub mod item;
pub mod taxonomy;

pub use comment::Comment;
pub use item::{ItemId, ItemType, ParseEnumError, Priority, State, WorkItem};
pub use taxonomy::{CynefinDomain, WorkParadigm};

//! Versioned enumeration mapping tables.
//!
//! Forward (external to canonical) mappings are total functions. Reverse
//! mappings are partial (the canonical vocabularies are wider), so every
//! canonical value without an exact inverse carries a declared default:
//!
//! | canonical | external | exact |
//! |---|---|---|
//! | `Found`       | `created`     | yes |
//! | `Triaged`     | `triaged`     | yes |
//! | `ToDo`        | `ready`       | yes |
//! | `InProgress`  | `in_progress` | yes |
//! | `InTest`      | `testing`     | yes |
//! | `Done`        | `done`        | yes |
//! | `Released`    | `done`        | no (declared collapse) |
//! | `Chore`       | `task`        | no (declared collapse) |
//! | `Goal`        | `epic`        | no (declared collapse) |
//!
//! `trivial` collapses to `Low` on the way in; priorities are exact on the
//! way out. The tables are plain `const` data: immutable at runtime, total
//! over their source enumeration, and covered by exhaustive tests.

use weir_core::model::item::{ItemType, Priority, State};

use crate::external::{ExternalPriority, ExternalState, ExternalType};

/// Version marker for the mapping tables as a set.
pub const TABLES_VERSION: &str = "1";

/// Canonical defaults for absent or unrecognized external values.
pub const DEFAULT_CANONICAL_STATE: State = State::Found;
pub const DEFAULT_CANONICAL_PRIORITY: Priority = Priority::Medium;
pub const DEFAULT_CANONICAL_TYPE: ItemType = ItemType::Task;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Total external → canonical state mapping.
#[must_use]
pub const fn state_to_canonical(state: ExternalState) -> State {
    match state {
        ExternalState::Created => State::Found,
        ExternalState::Triaged => State::Triaged,
        ExternalState::Ready => State::ToDo,
        ExternalState::InProgress => State::InProgress,
        ExternalState::Testing => State::InTest,
        ExternalState::Done => State::Done,
    }
}

/// Canonical → external state mapping.
///
/// The boolean is `false` when the result is the declared default rather
/// than an exact inverse (`Released` collapses onto `done`).
#[must_use]
pub const fn state_to_external(state: State) -> (ExternalState, bool) {
    match state {
        State::Found => (ExternalState::Created, true),
        State::Triaged => (ExternalState::Triaged, true),
        State::ToDo => (ExternalState::Ready, true),
        State::InProgress => (ExternalState::InProgress, true),
        State::InTest => (ExternalState::Testing, true),
        State::Done => (ExternalState::Done, true),
        State::Released => (ExternalState::Done, false),
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Total external → canonical priority mapping (`trivial` collapses to Low).
#[must_use]
pub const fn priority_to_canonical(priority: ExternalPriority) -> Priority {
    match priority {
        ExternalPriority::Trivial | ExternalPriority::Low => Priority::Low,
        ExternalPriority::Medium => Priority::Medium,
        ExternalPriority::High => Priority::High,
        ExternalPriority::Critical => Priority::Critical,
    }
}

/// Canonical → external priority mapping (always exact).
#[must_use]
pub const fn priority_to_external(priority: Priority) -> (ExternalPriority, bool) {
    match priority {
        Priority::Low => (ExternalPriority::Low, true),
        Priority::Medium => (ExternalPriority::Medium, true),
        Priority::High => (ExternalPriority::High, true),
        Priority::Critical => (ExternalPriority::Critical, true),
    }
}

// ---------------------------------------------------------------------------
// Item type
// ---------------------------------------------------------------------------

/// Total external → canonical type mapping.
#[must_use]
pub const fn type_to_canonical(item_type: ExternalType) -> ItemType {
    match item_type {
        ExternalType::Task => ItemType::Task,
        ExternalType::Bug => ItemType::Bug,
        ExternalType::Feature => ItemType::Feature,
        ExternalType::Epic => ItemType::Epic,
    }
}

/// Canonical → external type mapping.
///
/// `Chore` and `Goal` have no external equivalent and collapse onto the
/// declared defaults `task` and `epic`.
#[must_use]
pub const fn type_to_external(item_type: ItemType) -> (ExternalType, bool) {
    match item_type {
        ItemType::Task => (ExternalType::Task, true),
        ItemType::Bug => (ExternalType::Bug, true),
        ItemType::Feature => (ExternalType::Feature, true),
        ItemType::Epic => (ExternalType::Epic, true),
        ItemType::Chore => (ExternalType::Task, false),
        ItemType::Goal => (ExternalType::Epic, false),
    }
}

//! Bidirectional conversion between the external DTO and the canonical item.
//!
//! The mapper is best-effort by contract: malformed enumerated fields
//! degrade to the declared defaults and show up in the returned warning
//! list; only a missing identity aborts a conversion. Projection code stays
//! free of business rules: nothing here validates transitions or
//! classifications.
//!
//! # Metadata folding
//!
//! External named fields with no canonical counterpart (`reporter`,
//! `version`, `due_date`) fold into the canonical metadata map under the
//! [`EXT_KEY_PREFIX`] namespace, and unfold back out on the way home. Keys
//! the mapper did not write are left alone.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use weir_core::model::item::{ItemId, WorkItem};

use crate::external::{ExternalItem, ExternalPriority, ExternalState, ExternalType};
use crate::tables;

/// Namespace prefix for folded external fields in canonical metadata.
pub const EXT_KEY_PREFIX: &str = "ext.";

const KEY_REPORTER: &str = "ext.reporter";
const KEY_VERSION: &str = "ext.version";
const KEY_DUE_DATE: &str = "ext.due_date";

// ---------------------------------------------------------------------------
// Warnings and errors
// ---------------------------------------------------------------------------

/// A field that was defaulted or reduced during conversion. Collected, never
/// thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingWarning {
    pub field: &'static str,
    pub given: Option<String>,
    pub substituted: String,
}

impl fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.given {
            Some(given) => write!(
                f,
                "{}: '{}' has no exact mapping, using '{}'",
                self.field, given, self.substituted
            ),
            None => write!(f, "{}: absent, using '{}'", self.field, self.substituted),
        }
    }
}

/// Structurally impossible input, the only hard failure in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("item identity is missing or empty")]
    MissingIdentity,
}

// ---------------------------------------------------------------------------
// External → canonical
// ---------------------------------------------------------------------------

/// Convert an external item to canonical form.
///
/// # Errors
///
/// [`MappingError::MissingIdentity`] when `external.id` is absent or empty.
pub fn map_in(external: &ExternalItem) -> Result<(WorkItem, Vec<MappingWarning>), MappingError> {
    let id = external
        .id
        .as_deref()
        .and_then(ItemId::new)
        .ok_or(MappingError::MissingIdentity)?;

    let mut warnings = Vec::new();

    let state = match parse_enum::<ExternalState>(
        "status",
        external.status.as_deref(),
        tables::DEFAULT_CANONICAL_STATE.as_str(),
    ) {
        Ok(s) => tables::state_to_canonical(s),
        Err(warning) => {
            warnings.push(warning);
            tables::DEFAULT_CANONICAL_STATE
        }
    };

    let priority = match parse_enum::<ExternalPriority>(
        "priority",
        external.priority.as_deref(),
        tables::DEFAULT_CANONICAL_PRIORITY.as_str(),
    ) {
        Ok(p) => tables::priority_to_canonical(p),
        Err(warning) => {
            warnings.push(warning);
            tables::DEFAULT_CANONICAL_PRIORITY
        }
    };

    let item_type = match parse_enum::<ExternalType>(
        "item_type",
        external.item_type.as_deref(),
        tables::DEFAULT_CANONICAL_TYPE.as_str(),
    ) {
        Ok(t) => tables::type_to_canonical(t),
        Err(warning) => {
            warnings.push(warning);
            tables::DEFAULT_CANONICAL_TYPE
        }
    };

    let mut item = WorkItem {
        id,
        title: external.title.clone().unwrap_or_default(),
        description: external.description.clone().unwrap_or_default(),
        state,
        priority,
        item_type,
        assignees: external.assignee.iter().cloned().collect(),
        created_at: external.created.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        updated_at: external.updated.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        parent_id: external.parent.as_deref().and_then(ItemId::new),
        project_id: external.project.clone().filter(|p| !p.is_empty()),
        ..WorkItem::default()
    };

    fold(&mut item, KEY_REPORTER, external.reporter.as_deref());
    fold(&mut item, KEY_VERSION, external.version.as_deref());
    fold(&mut item, KEY_DUE_DATE, external.due_date.as_deref());

    if !warnings.is_empty() {
        debug!(item = %item.id, defaulted = warnings.len(), "map_in defaulted fields");
    }
    Ok((item, warnings))
}

// ---------------------------------------------------------------------------
// Canonical → external
// ---------------------------------------------------------------------------

/// Convert a canonical item to the external projection.
///
/// Never fails: canonical values without an exact external equivalent take
/// their declared defaults, reported as warnings.
#[must_use]
pub fn map_out(item: &WorkItem) -> (ExternalItem, Vec<MappingWarning>) {
    let mut warnings = Vec::new();

    let (state, state_exact) = tables::state_to_external(item.state);
    if !state_exact {
        warnings.push(MappingWarning {
            field: "status",
            given: Some(item.state.to_string()),
            substituted: state.to_string(),
        });
    }

    let (priority, priority_exact) = tables::priority_to_external(item.priority);
    if !priority_exact {
        warnings.push(MappingWarning {
            field: "priority",
            given: Some(item.priority.to_string()),
            substituted: priority.to_string(),
        });
    }

    let (item_type, type_exact) = tables::type_to_external(item.item_type);
    if !type_exact {
        warnings.push(MappingWarning {
            field: "item_type",
            given: Some(item.item_type.to_string()),
            substituted: item_type.to_string(),
        });
    }

    let assignee = item.assignees.first().cloned();
    if item.assignees.len() > 1 {
        // The projection has a single assignee slot.
        warnings.push(MappingWarning {
            field: "assignee",
            given: Some(item.assignees[1..].join(",")),
            substituted: assignee.clone().unwrap_or_default(),
        });
    }

    let external = ExternalItem {
        id: Some(item.id.to_string()),
        title: Some(item.title.clone()),
        description: Some(item.description.clone()),
        status: Some(state.to_string()),
        priority: Some(priority.to_string()),
        item_type: Some(item_type.to_string()),
        assignee,
        reporter: unfold(item, KEY_REPORTER),
        project: item.project_id.clone(),
        parent: item.parent_id.as_ref().map(ToString::to_string),
        version: unfold(item, KEY_VERSION),
        due_date: unfold(item, KEY_DUE_DATE),
        created: Some(item.created_at),
        updated: Some(item.updated_at),
    };

    (external, warnings)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an enumerated boundary string, or explain why the default applies.
fn parse_enum<T: FromStr>(
    field: &'static str,
    raw: Option<&str>,
    default_name: &str,
) -> Result<T, MappingWarning> {
    match raw {
        Some(value) => value.parse::<T>().map_err(|_| MappingWarning {
            field,
            given: Some(value.to_string()),
            substituted: default_name.to_string(),
        }),
        None => Err(MappingWarning {
            field,
            given: None,
            substituted: default_name.to_string(),
        }),
    }
}

fn fold(item: &mut WorkItem, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        item.metadata.insert(key.to_string(), value.to_string());
    }
}

fn unfold(item: &WorkItem, key: &str) -> Option<String> {
    item.metadata.get(key).cloned()
}

//! Classification derivation and paradigm compatibility.
//!
//! [`classify`] is a pure derivation: it reads the item's classification
//! fields (an unclassified item reads as Disorder), fills in policy
//! attributes from the profile table, and returns a value the caller may or
//! may not persist. Persisting goes through [`apply_classification`], the
//! only path that writes a domain/paradigm pairing onto an item, and the
//! one that rejects incompatible pairings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use weir_core::model::item::WorkItem;
use weir_core::model::taxonomy::{CynefinDomain, WorkParadigm};

use crate::profile::profile;

/// The derived classification of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub domain: CynefinDomain,
    pub paradigm: WorkParadigm,
    pub approach: &'static str,
    pub cognitive_load: u8,
}

/// Incompatible domain/paradigm pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("paradigm {paradigm} is not compatible with the {domain} domain")]
pub struct ClassificationConflict {
    pub domain: CynefinDomain,
    pub paradigm: WorkParadigm,
}

/// Whether `paradigm` belongs to `domain`'s compatible set.
#[must_use]
pub fn is_compatible(domain: CynefinDomain, paradigm: WorkParadigm) -> bool {
    profile(domain).compatible_paradigms.contains(&paradigm)
}

/// The fallback paradigm for `domain` (head of its compatible set).
#[must_use]
pub fn default_paradigm(domain: CynefinDomain) -> WorkParadigm {
    profile(domain).compatible_paradigms[0]
}

/// Derive the classification of `item` without mutating it.
///
/// The stored paradigm is honored only when it is compatible with the stored
/// domain; otherwise the domain's default paradigm supersedes it in the
/// derived result (the stored pairing stays untouched; only
/// [`apply_classification`] writes one).
#[must_use]
pub fn classify(item: &WorkItem) -> Classification {
    let domain = item.domain;
    let paradigm = item
        .paradigm
        .filter(|p| is_compatible(domain, *p))
        .unwrap_or_else(|| default_paradigm(domain));
    let p = profile(domain);

    debug!(item = %item.id, %domain, %paradigm, "classified");
    Classification {
        domain,
        paradigm,
        approach: p.approach,
        cognitive_load: p.suggested_load,
    }
}

/// Persist `classification` onto a copy of `item`.
///
/// Updates the classification fields and `updated_at`; nothing else.
///
/// # Errors
///
/// [`ClassificationConflict`] when the pairing is outside the domain's
/// compatible set, never silently accepted.
pub fn apply_classification(
    item: &WorkItem,
    classification: &Classification,
    now: DateTime<Utc>,
) -> Result<WorkItem, ClassificationConflict> {
    if !is_compatible(classification.domain, classification.paradigm) {
        return Err(ClassificationConflict {
            domain: classification.domain,
            paradigm: classification.paradigm,
        });
    }

    let mut updated = item.clone();
    updated.domain = classification.domain;
    updated.paradigm = Some(classification.paradigm);
    updated.cognitive_load = Some(classification.cognitive_load);
    updated.updated_at = now;
    Ok(updated)
}

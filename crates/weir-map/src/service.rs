//! The narrow entry points callers consume, wired through the tracker.
//!
//! Each public method follows the same shape: open an operation record, do
//! the work (map → transition/classify → store), close the record with the
//! result or the failure. Every failure path both closes a failed record and
//! returns the typed error; nothing is swallowed.

use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

use weir_classify::{Classification, ClassificationConflict, apply_classification, classify};
use weir_core::config::ProjectConfig;
use weir_core::error::ErrorCode;
use weir_core::model::item::{ItemId, State, WorkItem};
use weir_core::store::{ItemStore, MemoryStore, StoreError};
use weir_core::track::{OperationKind, OperationTracker, TrackError};
use weir_core::workflow::{self, TransitionError};

use crate::external::ExternalItem;
use crate::mapper::{self, MappingError, MappingWarning};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Anything a facade call can fail with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Classification(#[from] ClassificationConflict),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error("reopening a released item requires a reason comment")]
    FeedbackReasonRequired,
}

impl ServiceError {
    /// The machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Mapping(MappingError::MissingIdentity) => ErrorCode::MissingIdentity,
            Self::Transition(_) => ErrorCode::InvalidStateTransition,
            Self::Classification(_) => ErrorCode::ClassificationConflict,
            Self::Store(StoreError::NotFound(_)) => ErrorCode::ItemNotFound,
            Self::Store(StoreError::AlreadyExists(_)) => ErrorCode::ItemAlreadyExists,
            Self::Store(StoreError::ConcurrencyConflict { .. }) => ErrorCode::StaleWrite,
            Self::Track(TrackError::UnknownOperation(_) | TrackError::UnknownParent(_)) => {
                ErrorCode::OperationNotFound
            }
            Self::Track(TrackError::AlreadyClosed(_)) => ErrorCode::OperationAlreadyClosed,
            Self::Track(TrackError::OpenChildren { .. }) => ErrorCode::OperationParentOpen,
            Self::FeedbackReasonRequired => ErrorCode::FeedbackReasonRequired,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of submitting an external item.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub id: ItemId,
    pub warnings: Vec<MappingWarning>,
}

/// Result of a bulk transition: partial success is still success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<(ItemId, String)>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Facade over store + tracker + the pure cores.
#[derive(Debug)]
pub struct Service<S: ItemStore = MemoryStore> {
    store: S,
    tracker: OperationTracker,
    config: ProjectConfig,
}

impl Service<MemoryStore> {
    /// A service over the in-memory reference store.
    #[must_use]
    pub fn in_memory(config: ProjectConfig) -> Self {
        Self::new(MemoryStore::new(), config)
    }
}

impl<S: ItemStore> Service<S> {
    #[must_use]
    pub fn new(store: S, config: ProjectConfig) -> Self {
        Self {
            store,
            tracker: OperationTracker::new(),
            config,
        }
    }

    /// The audit trail for this service.
    #[must_use]
    pub const fn tracker(&self) -> &OperationTracker {
        &self.tracker
    }

    /// Direct access to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // -- submit -------------------------------------------------------------

    /// Accept an external item, convert it, and persist the canonical form.
    ///
    /// An absent identity is stamped with a generated one before mapping;
    /// conversion warnings are returned, not dropped.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Store`] when the identity is taken; mapping failures
    /// cannot occur past the identity stamp.
    pub fn submit(&self, external: &ExternalItem) -> Result<SubmitOutcome, ServiceError> {
        let op = self.tracker.track(
            "item-submit",
            OperationKind::Create,
            params(&[("title", external.title.as_deref().unwrap_or(""))]),
        );

        let mut stamped = external.clone();
        if stamped.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            stamped.id = Some(ItemId::generate().to_string());
        }

        match self.submit_inner(&stamped) {
            Ok(outcome) => {
                info!(item = %outcome.id, warnings = outcome.warnings.len(), "item submitted");
                op.complete(json!({
                    "id": outcome.id.to_string(),
                    "warnings": &outcome.warnings,
                }))?;
                Ok(outcome)
            }
            Err(err) => {
                op.fail(err.to_string())?;
                Err(err)
            }
        }
    }

    fn submit_inner(&self, external: &ExternalItem) -> Result<SubmitOutcome, ServiceError> {
        let (item, warnings) = mapper::map_in(external)?;
        let id = item.id.clone();
        self.store.insert(item)?;
        Ok(SubmitOutcome { id, warnings })
    }

    // -- read ---------------------------------------------------------------

    /// Fetch the canonical form of one item.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] via [`ServiceError::Store`].
    pub fn get(&self, id: &ItemId) -> Result<WorkItem, ServiceError> {
        self.store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()).into())
    }

    /// Project one item back out to the external representation.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] via [`ServiceError::Store`].
    pub fn export(
        &self,
        id: &ItemId,
    ) -> Result<(ExternalItem, Vec<MappingWarning>), ServiceError> {
        let op = self.tracker.track(
            "item-export",
            OperationKind::Read,
            params(&[("item", id.as_str())]),
        );

        match self.get(id).map(|item| mapper::map_out(&item)) {
            Ok((external, warnings)) => {
                op.complete(json!({ "warnings": &warnings }))?;
                Ok((external, warnings))
            }
            Err(err) => {
                op.fail(err.to_string())?;
                Err(err)
            }
        }
    }

    // -- transition ---------------------------------------------------------

    /// Apply a lifecycle transition and persist the result.
    ///
    /// # Errors
    ///
    /// Transition, store, or (when configured) a missing feedback reason.
    pub fn transition_item(
        &self,
        id: &ItemId,
        target: State,
        actor: &str,
        comment: Option<&str>,
    ) -> Result<WorkItem, ServiceError> {
        let op = self.tracker.track(
            "item-transition",
            OperationKind::Update,
            params(&[("item", id.as_str()), ("target", target.as_str())]),
        );

        match self.transition_inner(id, target, actor, comment) {
            Ok(item) => {
                op.complete(json!({ "state": item.state }))?;
                Ok(item)
            }
            Err(err) => {
                op.fail(err.to_string())?;
                Err(err)
            }
        }
    }

    fn transition_inner(
        &self,
        id: &ItemId,
        target: State,
        actor: &str,
        comment: Option<&str>,
    ) -> Result<WorkItem, ServiceError> {
        let item = self.get(id)?;

        if self.config.workflow.require_feedback_reason
            && item.state == State::Released
            && target == State::Found
            && comment.is_none()
        {
            return Err(ServiceError::FeedbackReasonRequired);
        }

        let updated = workflow::transition(&item, target, actor, comment, chrono::Utc::now())?;
        self.store
            .update(updated.clone(), self.expected_version(&item))?;
        Ok(updated)
    }

    // -- classification -----------------------------------------------------

    /// Derive (but do not persist) an item's classification.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] via [`ServiceError::Store`].
    pub fn classify_item(&self, id: &ItemId) -> Result<Classification, ServiceError> {
        let op = self.tracker.track(
            "item-classify",
            OperationKind::Validate,
            params(&[("item", id.as_str())]),
        );

        match self.get(id) {
            Ok(item) => {
                let classification = classify(&item);
                op.complete(json!(classification))?;
                Ok(classification)
            }
            Err(err) => {
                op.fail(err.to_string())?;
                Err(err)
            }
        }
    }

    /// Persist a classification onto an item.
    ///
    /// # Errors
    ///
    /// [`ClassificationConflict`] for an incompatible pairing, plus store
    /// failures.
    pub fn apply_item_classification(
        &self,
        id: &ItemId,
        classification: &Classification,
    ) -> Result<WorkItem, ServiceError> {
        let op = self.tracker.track(
            "item-classify-apply",
            OperationKind::Update,
            params(&[
                ("item", id.as_str()),
                ("domain", classification.domain.as_str()),
                ("paradigm", classification.paradigm.as_str()),
            ]),
        );

        match self.apply_classification_inner(id, classification) {
            Ok(item) => {
                op.complete(json!({ "domain": item.domain }))?;
                Ok(item)
            }
            Err(err) => {
                op.fail(err.to_string())?;
                Err(err)
            }
        }
    }

    fn apply_classification_inner(
        &self,
        id: &ItemId,
        classification: &Classification,
    ) -> Result<WorkItem, ServiceError> {
        let item = self.get(id)?;
        let updated = apply_classification(&item, classification, chrono::Utc::now())?;
        self.store
            .update(updated.clone(), self.expected_version(&item))?;
        Ok(updated)
    }

    // -- bulk ---------------------------------------------------------------

    /// Transition many items under one parent operation.
    ///
    /// Each item gets its own child record; a failed item fails only its
    /// child. The parent completes with the aggregated summary even when
    /// some children failed: partial success is reported, not hidden.
    ///
    /// # Errors
    ///
    /// Only tracker misuse; per-item failures land in the outcome.
    pub fn bulk_transition(
        &self,
        ids: &[ItemId],
        target: State,
        actor: &str,
    ) -> Result<BulkOutcome, ServiceError> {
        let count = ids.len().to_string();
        let op = self.tracker.track(
            "bulk-transition",
            OperationKind::Update,
            params(&[("target", target.as_str()), ("count", count.as_str())]),
        );

        let mut failures = Vec::new();
        for id in ids {
            let child = op.child(
                "bulk-transition-item",
                OperationKind::Update,
                params(&[("item", id.as_str())]),
            )?;
            match self.transition_inner(id, target, actor, None) {
                Ok(item) => child.complete(json!({ "state": item.state }))?,
                Err(err) => {
                    failures.push((id.clone(), err.to_string()));
                    child.fail(err.to_string())?;
                }
            }
        }

        let summary = self.tracker.child_summary(op.id())?;
        op.complete(json!(summary))?;

        info!(
            total = summary.total,
            failed = summary.failed,
            "bulk transition finished"
        );
        Ok(BulkOutcome {
            total: summary.total,
            succeeded: summary.succeeded,
            failed: summary.failed,
            failures,
        })
    }

    // -- helpers ------------------------------------------------------------

    fn expected_version(&self, read: &WorkItem) -> Option<chrono::DateTime<chrono::Utc>> {
        self.config.store.optimistic.then_some(read.updated_at)
    }
}

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

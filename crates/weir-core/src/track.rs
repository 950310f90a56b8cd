//! Hierarchical operation tracking.
//!
//! Every mutating or queried operation gets an audit record. Records form a
//! tree via `parent_id` but live in a flat table, so they persist and query
//! independently of each other.
//!
//! # Lifecycle of a record
//!
//! | call | status | notes |
//! |---|---|---|
//! | `start` / `start_child` | `InProgress` | start timestamp stamped |
//! | `complete` | `Completed` | end timestamp + result payload |
//! | `fail` | `Failed` | end timestamp + error detail |
//!
//! Closed records are immutable; re-closing one is a programmer error and
//! surfaces immediately as [`TrackError::AlreadyClosed`]. A parent cannot
//! close while any child is still open, which makes the invariant "a child's
//! interval lies within its parent's" structural.
//!
//! A failed child never fails its parent automatically: the parent reads
//! [`OperationTracker::child_summary`] and decides its own final status
//! (a bulk operation with one failed child still completes, reporting
//! partial success).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// What kind of work an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
    Validate,
    Search,
    Manage,
}

impl OperationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Validate => "validate",
            Self::Search => "search",
            Self::Manage => "manage",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record is in its own lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    InProgress,
    Completed,
    Failed,
}

/// Identity of one operation record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OperationId(u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// One audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub id: OperationId,
    pub name: String,
    pub kind: OperationKind,
    pub params: BTreeMap<String, String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: OperationStatus,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub parent_id: Option<OperationId>,
}

impl OperationRecord {
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        !matches!(self.status, OperationStatus::InProgress)
    }
}

/// Aggregated child outcomes under one parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Read-only query over the record table. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct OperationFilter {
    pub name: Option<String>,
    pub kind: Option<OperationKind>,
    pub status: Option<OperationStatus>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub parent_id: Option<OperationId>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Tracker misuse. These are programmer errors and surface immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TrackError {
    #[error("unknown operation {0}")]
    UnknownOperation(OperationId),
    #[error("operation {0} is already closed")]
    AlreadyClosed(OperationId),
    #[error("unknown parent operation {0}")]
    UnknownParent(OperationId),
    #[error("operation {parent} still has {open} open child operation(s)")]
    OpenChildren { parent: OperationId, open: usize },
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Flat, append-only store of operation records.
///
/// The table is the only shared mutable state here; the lock is held for
/// single-record bookkeeping only, never across caller work.
#[derive(Debug, Default)]
pub struct OperationTracker {
    next_id: AtomicU64,
    records: RwLock<BTreeMap<OperationId, OperationRecord>>,
}

impl OperationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a top-level record in `InProgress` status.
    pub fn start(
        &self,
        name: impl Into<String>,
        kind: OperationKind,
        params: BTreeMap<String, String>,
    ) -> OperationId {
        // A missing parent is the only failure mode, so this cannot fail.
        match self.open(None, name.into(), kind, params) {
            Ok(id) => id,
            Err(_) => unreachable!("top-level start has no parent to validate"),
        }
    }

    /// Open a record nested under `parent`.
    ///
    /// # Errors
    ///
    /// [`TrackError::UnknownParent`] if `parent` does not exist;
    /// [`TrackError::AlreadyClosed`] if it is no longer open (a child's
    /// interval must lie within its parent's).
    pub fn start_child(
        &self,
        parent: OperationId,
        name: impl Into<String>,
        kind: OperationKind,
        params: BTreeMap<String, String>,
    ) -> Result<OperationId, TrackError> {
        self.open(Some(parent), name.into(), kind, params)
    }

    fn open(
        &self,
        parent: Option<OperationId>,
        name: String,
        kind: OperationKind,
        params: BTreeMap<String, String>,
    ) -> Result<OperationId, TrackError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());

        if let Some(parent_id) = parent {
            let parent_record = records
                .get(&parent_id)
                .ok_or(TrackError::UnknownParent(parent_id))?;
            if parent_record.is_closed() {
                return Err(TrackError::AlreadyClosed(parent_id));
            }
        }

        let id = OperationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(operation = %id, %name, %kind, parent = ?parent, "operation started");
        records.insert(
            id,
            OperationRecord {
                id,
                name,
                kind,
                params,
                started_at: Utc::now(),
                ended_at: None,
                status: OperationStatus::InProgress,
                result: None,
                error: None,
                parent_id: parent,
            },
        );
        Ok(id)
    }

    /// Close `id` as `Completed`, storing the result payload.
    ///
    /// # Errors
    ///
    /// [`TrackError::UnknownOperation`], [`TrackError::AlreadyClosed`], or
    /// [`TrackError::OpenChildren`] when children are still in progress.
    pub fn complete(&self, id: OperationId, result: Value) -> Result<(), TrackError> {
        self.close(id, OperationStatus::Completed, Some(result), None)
    }

    /// Close `id` as `Failed`, storing the error detail.
    ///
    /// # Errors
    ///
    /// Same conditions as [`OperationTracker::complete`].
    pub fn fail(&self, id: OperationId, error: impl Into<String>) -> Result<(), TrackError> {
        self.close(id, OperationStatus::Failed, None, Some(error.into()))
    }

    fn close(
        &self,
        id: OperationId,
        status: OperationStatus,
        result: Option<Value>,
        error: Option<String>,
    ) -> Result<(), TrackError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());

        let open_children = records
            .values()
            .filter(|r| r.parent_id == Some(id) && !r.is_closed())
            .count();
        if open_children > 0 {
            return Err(TrackError::OpenChildren {
                parent: id,
                open: open_children,
            });
        }

        let record = records.get_mut(&id).ok_or(TrackError::UnknownOperation(id))?;
        if record.is_closed() {
            return Err(TrackError::AlreadyClosed(id));
        }

        record.ended_at = Some(Utc::now());
        record.status = status;
        record.result = result;
        record.error = error;

        match status {
            OperationStatus::Failed => {
                warn!(operation = %id, name = %record.name, error = ?record.error, "operation failed");
            }
            _ => debug!(operation = %id, name = %record.name, "operation completed"),
        }
        Ok(())
    }

    /// Snapshot one record.
    #[must_use]
    pub fn get(&self, id: OperationId) -> Option<OperationRecord> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    /// Records matching `filter`, in start order. Read-only.
    #[must_use]
    pub fn query(&self, filter: &OperationFilter) -> Vec<OperationRecord> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|r| {
                filter.name.as_ref().is_none_or(|n| &r.name == n)
                    && filter.kind.is_none_or(|k| r.kind == k)
                    && filter.status.is_none_or(|s| r.status == s)
                    && filter.since.is_none_or(|t| r.started_at >= t)
                    && filter.until.is_none_or(|t| r.started_at <= t)
                    && filter.parent_id.is_none_or(|p| r.parent_id == Some(p))
            })
            .cloned()
            .collect()
    }

    /// Aggregate the outcomes of `parent`'s direct children.
    ///
    /// # Errors
    ///
    /// [`TrackError::UnknownOperation`] if `parent` does not exist.
    pub fn child_summary(&self, parent: OperationId) -> Result<OperationSummary, TrackError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        if !records.contains_key(&parent) {
            return Err(TrackError::UnknownOperation(parent));
        }

        let mut summary = OperationSummary {
            total: 0,
            succeeded: 0,
            failed: 0,
        };
        for record in records.values().filter(|r| r.parent_id == Some(parent)) {
            summary.total += 1;
            match record.status {
                OperationStatus::Completed => summary.succeeded += 1,
                OperationStatus::Failed => summary.failed += 1,
                OperationStatus::InProgress => {}
            }
        }
        Ok(summary)
    }

    /// Open a top-level record and hand back a closing handle.
    pub fn track(
        &self,
        name: impl Into<String>,
        kind: OperationKind,
        params: BTreeMap<String, String>,
    ) -> OperationHandle<'_> {
        OperationHandle {
            tracker: self,
            id: self.start(name, kind, params),
        }
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// A borrowed view of one open operation.
///
/// Closing consumes the handle, so a record can only be closed once through
/// it. Dropping a handle without closing leaves the record in progress,
/// which shows up in queries. That is the point.
#[derive(Debug)]
pub struct OperationHandle<'a> {
    tracker: &'a OperationTracker,
    id: OperationId,
}

impl<'a> OperationHandle<'a> {
    #[must_use]
    pub const fn id(&self) -> OperationId {
        self.id
    }

    /// Open a child operation under this one.
    ///
    /// # Errors
    ///
    /// See [`OperationTracker::start_child`].
    pub fn child(
        &self,
        name: impl Into<String>,
        kind: OperationKind,
        params: BTreeMap<String, String>,
    ) -> Result<OperationHandle<'a>, TrackError> {
        Ok(OperationHandle {
            tracker: self.tracker,
            id: self.tracker.start_child(self.id, name, kind, params)?,
        })
    }

    /// Close as completed.
    ///
    /// # Errors
    ///
    /// See [`OperationTracker::complete`].
    pub fn complete(self, result: Value) -> Result<(), TrackError> {
        self.tracker.complete(self.id, result)
    }

    /// Close as failed.
    ///
    /// # Errors
    ///
    /// See [`OperationTracker::fail`].
    pub fn fail(self, error: impl Into<String>) -> Result<(), TrackError> {
        self.tracker.fail(self.id, error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // === Open/close lifecycle ===

    #[test]
    fn start_opens_in_progress_record() {
        let tracker = OperationTracker::new();
        let id = tracker.start("item-create", OperationKind::Create, params(&[("title", "x")]));

        let record = tracker.get(id).unwrap();
        assert_eq!(record.status, OperationStatus::InProgress);
        assert_eq!(record.name, "item-create");
        assert_eq!(record.kind, OperationKind::Create);
        assert_eq!(record.params.get("title").map(String::as_str), Some("x"));
        assert!(record.ended_at.is_none());
        assert!(record.parent_id.is_none());
    }

    #[test]
    fn complete_stamps_end_and_result() {
        let tracker = OperationTracker::new();
        let id = tracker.start("item-read", OperationKind::Read, BTreeMap::new());
        tracker.complete(id, json!({"found": true})).unwrap();

        let record = tracker.get(id).unwrap();
        assert_eq!(record.status, OperationStatus::Completed);
        assert_eq!(record.result, Some(json!({"found": true})));
        assert!(record.error.is_none());
        assert!(record.ended_at.unwrap() >= record.started_at);
    }

    #[test]
    fn fail_stores_error_detail() {
        let tracker = OperationTracker::new();
        let id = tracker.start("item-update", OperationKind::Update, BTreeMap::new());
        tracker.fail(id, "item not found").unwrap();

        let record = tracker.get(id).unwrap();
        assert_eq!(record.status, OperationStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("item not found"));
        assert!(record.result.is_none());
    }

    #[test]
    fn closing_twice_is_an_error() {
        let tracker = OperationTracker::new();
        let id = tracker.start("op", OperationKind::Read, BTreeMap::new());
        tracker.complete(id, json!(null)).unwrap();

        assert_eq!(
            tracker.complete(id, json!(null)).unwrap_err(),
            TrackError::AlreadyClosed(id)
        );
        assert_eq!(
            tracker.fail(id, "late").unwrap_err(),
            TrackError::AlreadyClosed(id)
        );
    }

    #[test]
    fn closing_unknown_operation_is_an_error() {
        let tracker = OperationTracker::new();
        let id = tracker.start("op", OperationKind::Read, BTreeMap::new());
        tracker.complete(id, json!(null)).unwrap();

        let bogus = OperationId(9999);
        assert_eq!(
            tracker.complete(bogus, json!(null)).unwrap_err(),
            TrackError::UnknownOperation(bogus)
        );
    }

    // === Hierarchy ===

    #[test]
    fn child_records_reference_parent() {
        let tracker = OperationTracker::new();
        let parent = tracker.start("bulk-update", OperationKind::Update, BTreeMap::new());
        let child = tracker
            .start_child(parent, "bulk-update-item", OperationKind::Update, BTreeMap::new())
            .unwrap();

        assert_eq!(tracker.get(child).unwrap().parent_id, Some(parent));
    }

    #[test]
    fn child_of_unknown_parent_is_rejected() {
        let tracker = OperationTracker::new();
        let bogus = OperationId(42);
        assert_eq!(
            tracker
                .start_child(bogus, "x", OperationKind::Read, BTreeMap::new())
                .unwrap_err(),
            TrackError::UnknownParent(bogus)
        );
    }

    #[test]
    fn child_of_closed_parent_is_rejected() {
        let tracker = OperationTracker::new();
        let parent = tracker.start("op", OperationKind::Read, BTreeMap::new());
        tracker.complete(parent, json!(null)).unwrap();

        assert_eq!(
            tracker
                .start_child(parent, "late-child", OperationKind::Read, BTreeMap::new())
                .unwrap_err(),
            TrackError::AlreadyClosed(parent)
        );
    }

    #[test]
    fn parent_cannot_close_before_children() {
        let tracker = OperationTracker::new();
        let parent = tracker.start("bulk", OperationKind::Update, BTreeMap::new());
        let child = tracker
            .start_child(parent, "bulk-item", OperationKind::Update, BTreeMap::new())
            .unwrap();

        assert_eq!(
            tracker.complete(parent, json!(null)).unwrap_err(),
            TrackError::OpenChildren { parent, open: 1 }
        );

        tracker.complete(child, json!(null)).unwrap();
        tracker.complete(parent, json!(null)).unwrap();

        // Parent closed last: its interval contains the child's.
        let p = tracker.get(parent).unwrap();
        let c = tracker.get(child).unwrap();
        assert!(c.started_at >= p.started_at);
        assert!(c.ended_at.unwrap() <= p.ended_at.unwrap());
    }

    #[test]
    fn failed_child_does_not_fail_parent() {
        let tracker = OperationTracker::new();
        let parent = tracker.start("bulk-update", OperationKind::Update, BTreeMap::new());

        for i in 0..5 {
            let child = tracker
                .start_child(parent, "bulk-update-item", OperationKind::Update, BTreeMap::new())
                .unwrap();
            if i == 2 {
                tracker.fail(child, "stale write").unwrap();
            } else {
                tracker.complete(child, json!({"index": i})).unwrap();
            }
        }

        let summary = tracker.child_summary(parent).unwrap();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 4);

        // The parent decides: partial success still completes.
        tracker
            .complete(parent, serde_json::to_value(summary).unwrap())
            .unwrap();
        assert_eq!(
            tracker.get(parent).unwrap().status,
            OperationStatus::Completed
        );
    }

    #[test]
    fn summary_of_unknown_parent_is_an_error() {
        let tracker = OperationTracker::new();
        let bogus = OperationId(7);
        assert_eq!(
            tracker.child_summary(bogus).unwrap_err(),
            TrackError::UnknownOperation(bogus)
        );
    }

    // === Query ===

    #[test]
    fn query_filters_by_name_kind_status() {
        let tracker = OperationTracker::new();
        let a = tracker.start("item-create", OperationKind::Create, BTreeMap::new());
        let b = tracker.start("item-read", OperationKind::Read, BTreeMap::new());
        tracker.start("item-read", OperationKind::Read, BTreeMap::new());
        tracker.complete(a, json!(null)).unwrap();
        tracker.fail(b, "boom").unwrap();

        let by_name = tracker.query(&OperationFilter {
            name: Some("item-read".to_string()),
            ..OperationFilter::default()
        });
        assert_eq!(by_name.len(), 2);

        let by_kind = tracker.query(&OperationFilter {
            kind: Some(OperationKind::Create),
            ..OperationFilter::default()
        });
        assert_eq!(by_kind.len(), 1);
        assert_eq!(by_kind[0].id, a);

        let failed = tracker.query(&OperationFilter {
            status: Some(OperationStatus::Failed),
            ..OperationFilter::default()
        });
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].id, b);
    }

    #[test]
    fn query_filters_by_time_range() {
        let tracker = OperationTracker::new();
        let id = tracker.start("op", OperationKind::Read, BTreeMap::new());
        let started = tracker.get(id).unwrap().started_at;

        let hit = tracker.query(&OperationFilter {
            since: Some(started),
            until: Some(started),
            ..OperationFilter::default()
        });
        assert_eq!(hit.len(), 1);

        let miss = tracker.query(&OperationFilter {
            since: Some(started + chrono::Duration::seconds(1)),
            ..OperationFilter::default()
        });
        assert!(miss.is_empty());
    }

    #[test]
    fn query_returns_records_in_start_order() {
        let tracker = OperationTracker::new();
        let first = tracker.start("a", OperationKind::Read, BTreeMap::new());
        let second = tracker.start("b", OperationKind::Read, BTreeMap::new());
        let all = tracker.query(&OperationFilter::default());
        assert_eq!(all[0].id, first);
        assert_eq!(all[1].id, second);
    }

    // === Handle ===

    #[test]
    fn handle_tracks_and_closes() {
        let tracker = OperationTracker::new();
        let op = tracker.track("item-create", OperationKind::Create, BTreeMap::new());
        let id = op.id();
        op.complete(json!({"id": "wk-1"})).unwrap();
        assert_eq!(tracker.get(id).unwrap().status, OperationStatus::Completed);
    }

    #[test]
    fn handle_children_aggregate() {
        let tracker = OperationTracker::new();
        let op = tracker.track("bulk", OperationKind::Update, BTreeMap::new());
        let parent_id = op.id();

        let ok = op.child("bulk-item", OperationKind::Update, BTreeMap::new()).unwrap();
        let bad = op.child("bulk-item", OperationKind::Update, BTreeMap::new()).unwrap();
        ok.complete(json!(null)).unwrap();
        bad.fail("conflict").unwrap();

        let summary = tracker.child_summary(parent_id).unwrap();
        assert_eq!((summary.total, summary.succeeded, summary.failed), (2, 1, 1));
        op.complete(serde_json::to_value(summary).unwrap()).unwrap();
    }

    // === Concurrency ===

    #[test]
    fn parallel_operations_do_not_interfere() {
        use std::sync::Arc;

        let tracker = Arc::new(OperationTracker::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let tracker = Arc::clone(&tracker);
            handles.push(std::thread::spawn(move || {
                let id = tracker.start(format!("worker-{i}"), OperationKind::Update, BTreeMap::new());
                tracker.complete(id, json!({"worker": i})).unwrap();
                id
            }));
        }

        let ids: Vec<OperationId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let unique: std::collections::HashSet<OperationId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 8);
        for id in ids {
            assert_eq!(tracker.get(id).unwrap().status, OperationStatus::Completed);
        }
    }
}

//! Lifecycle state machine for canonical work items.
//!
//! The lifecycle is a fixed chain with one feedback edge:
//!
//! ```text
//! Found → Triaged → ToDo → InProgress → InTest → Done → Released
//!   ↑                                                      |
//!   └────────────────────── feedback ──────────────────────┘
//! ```
//!
//! The machine is a closed set of states over an explicit adjacency table,
//! not a general graph: an invalid edge is a constant-time lookup miss, and
//! no new edge can appear without editing [`EDGES`].
//!
//! # Purity
//!
//! [`transition`] is a pure function of (current state, requested state). It
//! holds no mutable state of its own and returns a new item; persisting the
//! result is the caller's responsibility.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::comment::Comment;
use crate::model::item::{State, WorkItem};

// ---------------------------------------------------------------------------
// Adjacency table
// ---------------------------------------------------------------------------

/// Every legal edge: the six forward chain edges plus the single
/// `Released → Found` feedback edge (rework loop).
pub const EDGES: [(State, State); 7] = [
    (State::Found, State::Triaged),
    (State::Triaged, State::ToDo),
    (State::ToDo, State::InProgress),
    (State::InProgress, State::InTest),
    (State::InTest, State::Done),
    (State::Done, State::Released),
    (State::Released, State::Found),
];

/// Whether `from → to` is a legal edge.
#[must_use]
pub fn is_valid_edge(from: State, to: State) -> bool {
    EDGES.contains(&(from, to))
}

/// The legal targets from `from` (zero or one in this lifecycle).
#[must_use]
pub fn targets_from(from: State) -> Vec<State> {
    EDGES
        .iter()
        .filter(|(f, _)| *f == from)
        .map(|(_, t)| *t)
        .collect()
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error for requests outside the adjacency table.
///
/// Illegal edges are always rejected, never coerced to the nearest legal
/// target and never retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: State, to: State },
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Apply a lifecycle transition to `item`.
///
/// On success the returned item has the new state, `updated_at` set to `now`,
/// and, when `comment` was supplied, an audit comment authored by `actor`
/// appended to the thread. No other field is touched.
///
/// # Errors
///
/// [`TransitionError::InvalidTransition`] when `target` is not adjacent to
/// the item's current state (and the request is not the feedback edge).
pub fn transition(
    item: &WorkItem,
    target: State,
    actor: &str,
    comment: Option<&str>,
    now: DateTime<Utc>,
) -> Result<WorkItem, TransitionError> {
    let from = item.state;
    if !is_valid_edge(from, target) {
        return Err(TransitionError::InvalidTransition { from, to: target });
    }

    let mut updated = item.clone();
    updated.state = target;
    updated.updated_at = now;
    if let Some(body) = comment {
        updated.comments.push(Comment::new(body, actor, now));
    }

    debug!(
        item = %item.id,
        %from,
        to = %target,
        actor,
        "transition applied"
    );
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

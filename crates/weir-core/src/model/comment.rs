use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single comment in an item's thread.
///
/// `parent_id` references another comment on the same item for threaded
/// replies; top-level comments leave it unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: String,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Comment {
    /// Create a top-level comment with a generated id.
    #[must_use]
    pub fn new(body: impl Into<String>, author: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: format!("cm-{}", uuid::Uuid::new_v4()),
            body: body.into(),
            author: author.into(),
            at,
            parent_id: None,
        }
    }

    /// Create a threaded reply to `parent`.
    #[must_use]
    pub fn reply_to(
        parent: &Comment,
        body: impl Into<String>,
        author: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            parent_id: Some(parent.id.clone()),
            ..Self::new(body, author, at)
        }
    }
}

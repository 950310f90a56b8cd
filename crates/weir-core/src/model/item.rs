use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use crate::model::comment::Comment;
use crate::model::taxonomy::{CynefinDomain, WorkParadigm};

/// Opaque work item identity.
///
/// Callers may supply any non-empty string; items created inside weir get a
/// `wk-`-prefixed UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an existing identity string.
    ///
    /// Returns `None` for an empty or whitespace-only string; identity is
    /// the one mandatory field on every representation.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Wrap without validation. For literals in tests and trusted callers.
    pub fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Generate a fresh `wk-`-prefixed identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("wk-{}", uuid::Uuid::new_v4()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The canonical lifecycle states, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Found,
    Triaged,
    ToDo,
    InProgress,
    InTest,
    Done,
    Released,
}

impl State {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::Triaged => "triaged",
            Self::ToDo => "to_do",
            Self::InProgress => "in_progress",
            Self::InTest => "in_test",
            Self::Done => "done",
            Self::Released => "released",
        }
    }

    /// All states in chain order.
    pub const ALL: [State; 7] = [
        Self::Found,
        Self::Triaged,
        Self::ToDo,
        Self::InProgress,
        Self::InTest,
        Self::Done,
        Self::Released,
    ];

    /// Whether this is the terminal marker of active life.
    ///
    /// Released items stay queryable forever; nothing is deleted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Released)
    }
}

/// Canonical priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub const ALL: [Priority; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

/// The kinds of work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Task,
    Bug,
    Chore,
    Feature,
    Epic,
    Goal,
}

impl Default for ItemType {
    fn default() -> Self {
        Self::Task
    }
}

impl ItemType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Chore => "chore",
            Self::Feature => "feature",
            Self::Epic => "epic",
            Self::Goal => "goal",
        }
    }

    pub const ALL: [ItemType; 6] = [
        Self::Task,
        Self::Bug,
        Self::Chore,
        Self::Feature,
        Self::Epic,
        Self::Goal,
    ];
}

/// The canonical work item, the single authoritative form.
///
/// Boundary-facing projections are produced from this and fold back into it;
/// the canonical side never learns their field layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkItem {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub state: State,
    pub priority: Priority,
    pub item_type: ItemType,
    pub assignees: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub parent_id: Option<ItemId>,
    pub project_id: Option<String>,
    pub domain: CynefinDomain,
    pub paradigm: Option<WorkParadigm>,
    pub cognitive_load: Option<u8>,
    pub outcome: String,
    pub key_results: Vec<String>,
    pub dependencies: Vec<ItemId>,
    pub related: Vec<ItemId>,
    pub knowledge_links: Vec<String>,
    pub attachments: Vec<String>,
    pub comments: Vec<Comment>,
    pub metadata: BTreeMap<String, String>,
}

impl Default for WorkItem {
    fn default() -> Self {
        Self {
            id: ItemId::new_unchecked(""),
            title: String::new(),
            description: String::new(),
            state: State::Found,
            priority: Priority::Medium,
            item_type: ItemType::Task,
            assignees: Vec::new(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
            parent_id: None,
            project_id: None,
            domain: CynefinDomain::Disorder,
            paradigm: None,
            cognitive_load: None,
            outcome: String::new(),
            key_results: Vec::new(),
            dependencies: Vec::new(),
            related: Vec::new(),
            knowledge_links: Vec::new(),
            attachments: Vec::new(),
            comments: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }
}

impl WorkItem {
    /// Create a new item with a fresh identity and both timestamps set to `now`.
    #[must_use]
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: ItemId::generate(),
            title: title.into(),
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for State {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "found" => Ok(Self::Found),
            "triaged" => Ok(Self::Triaged),
            "to_do" => Ok(Self::ToDo),
            "in_progress" => Ok(Self::InProgress),
            "in_test" => Ok(Self::InTest),
            "done" => Ok(Self::Done),
            "released" => Ok(Self::Released),
            _ => Err(ParseEnumError {
                expected: "state",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for ItemType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "task" => Ok(Self::Task),
            "bug" => Ok(Self::Bug),
            "chore" => Ok(Self::Chore),
            "feature" => Ok(Self::Feature),
            "epic" => Ok(Self::Epic),
            "goal" => Ok(Self::Goal),
            _ => Err(ParseEnumError {
                expected: "item type",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemId, ItemType, Priority, State, WorkItem};
    use crate::model::taxonomy::CynefinDomain;
    use std::str::FromStr;

    #[test]
    fn item_id_rejects_empty() {
        assert!(ItemId::new("").is_none());
        assert!(ItemId::new("   ").is_none());
        assert!(ItemId::new("wk-1").is_some());
    }

    #[test]
    fn item_id_generate_is_prefixed_and_unique() {
        let a = ItemId::generate();
        let b = ItemId::generate();
        assert!(a.as_str().starts_with("wk-"));
        assert_ne!(a, b);
    }

    #[test]
    fn enum_json_roundtrips() {
        assert_eq!(serde_json::to_string(&State::ToDo).unwrap(), "\"to_do\"");
        assert_eq!(
            serde_json::to_string(&State::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&Priority::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(serde_json::to_string(&ItemType::Bug).unwrap(), "\"bug\"");

        assert_eq!(
            serde_json::from_str::<State>("\"in_test\"").unwrap(),
            State::InTest
        );
        assert_eq!(
            serde_json::from_str::<Priority>("\"low\"").unwrap(),
            Priority::Low
        );
        assert_eq!(
            serde_json::from_str::<ItemType>("\"goal\"").unwrap(),
            ItemType::Goal
        );
    }

    #[test]
    fn display_parse_roundtrips() {
        for value in State::ALL {
            let rendered = value.to_string();
            let reparsed = State::from_str(&rendered).unwrap();
            assert_eq!(value, reparsed);
        }

        for value in Priority::ALL {
            let rendered = value.to_string();
            let reparsed = Priority::from_str(&rendered).unwrap();
            assert_eq!(value, reparsed);
        }

        for value in ItemType::ALL {
            let rendered = value.to_string();
            let reparsed = ItemType::from_str(&rendered).unwrap();
            assert_eq!(value, reparsed);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(State::from_str("IN_PROGRESS").unwrap(), State::InProgress);
        assert_eq!(Priority::from_str(" High ").unwrap(), Priority::High);
        assert_eq!(ItemType::from_str("EPIC").unwrap(), ItemType::Epic);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!(State::from_str("active").is_err());
        assert!(Priority::from_str("urgent").is_err());
        assert!(ItemType::from_str("spike").is_err());
    }

    #[test]
    fn only_released_is_terminal() {
        for state in State::ALL {
            assert_eq!(state.is_terminal(), state == State::Released);
        }
    }

    #[test]
    fn work_item_default_is_stable() {
        let item = WorkItem::default();
        assert_eq!(item.state, State::Found);
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.item_type, ItemType::Task);
        assert_eq!(item.domain, CynefinDomain::Disorder);
        assert!(item.paradigm.is_none());
        assert!(item.cognitive_load.is_none());
        assert!(item.assignees.is_empty());
        assert!(item.comments.is_empty());
        assert!(item.metadata.is_empty());
    }

    #[test]
    fn new_item_stamps_both_timestamps() {
        let now = chrono::Utc::now();
        let item = WorkItem::new("Fix auth", now);
        assert_eq!(item.created_at, now);
        assert_eq!(item.updated_at, now);
        assert_eq!(item.title, "Fix auth");
        assert!(item.id.as_str().starts_with("wk-"));
    }
}

//! The boundary-facing projection of a work item.
//!
//! Interactive tooling speaks this shape, not the canonical one. Its
//! enumerations have their own vocabulary, and the enumerated fields travel
//! as loose strings because tooling input is untrusted. Parsing happens in
//! the mapper, which degrades unknown values to defaults instead of
//! rejecting them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use weir_core::model::item::ParseEnumError;

/// External lifecycle vocabulary (six states; the canonical side has seven).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalState {
    Created,
    Triaged,
    Ready,
    InProgress,
    Testing,
    Done,
}

impl ExternalState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Triaged => "triaged",
            Self::Ready => "ready",
            Self::InProgress => "in_progress",
            Self::Testing => "testing",
            Self::Done => "done",
        }
    }

    pub const ALL: [ExternalState; 6] = [
        Self::Created,
        Self::Triaged,
        Self::Ready,
        Self::InProgress,
        Self::Testing,
        Self::Done,
    ];
}

/// External priority vocabulary (five values; canonical has four).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalPriority {
    Trivial,
    Low,
    Medium,
    High,
    Critical,
}

impl ExternalPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub const ALL: [ExternalPriority; 5] = [
        Self::Trivial,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Critical,
    ];
}

/// External item-type vocabulary (four values; canonical has six).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalType {
    Task,
    Bug,
    Feature,
    Epic,
}

impl ExternalType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Epic => "epic",
        }
    }

    pub const ALL: [ExternalType; 4] = [Self::Task, Self::Bug, Self::Feature, Self::Epic];
}

impl fmt::Display for ExternalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExternalPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExternalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for ExternalState {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "created" => Ok(Self::Created),
            "triaged" => Ok(Self::Triaged),
            "ready" => Ok(Self::Ready),
            "in_progress" => Ok(Self::InProgress),
            "testing" => Ok(Self::Testing),
            "done" => Ok(Self::Done),
            _ => Err(ParseEnumError {
                expected: "external state",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for ExternalPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "trivial" => Ok(Self::Trivial),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseEnumError {
                expected: "external priority",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for ExternalType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "task" => Ok(Self::Task),
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            "epic" => Ok(Self::Epic),
            _ => Err(ParseEnumError {
                expected: "external type",
                got: s.to_string(),
            }),
        }
    }
}

/// The external work item DTO.
///
/// Explicit named fields instead of a metadata map; everything optional
/// except that a conversion to canonical form demands an identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalItem {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub item_type: Option<String>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub project: Option<String>,
    pub parent: Option<String>,
    pub version: Option<String>,
    pub due_date: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

//! Classification vocabulary shared across the workspace.
//!
//! The enums live here so the canonical item can carry them; the profile
//! table and derivation logic live in `weir-classify`.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::item::ParseEnumError;

/// How predictable an item's cause-and-effect relationship is.
///
/// `Disorder` means "not yet classified or ambiguous" and is the default for
/// every new item; callers are expected to re-classify out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CynefinDomain {
    Obvious,
    Complicated,
    Complex,
    Chaotic,
    Disorder,
}

impl Default for CynefinDomain {
    fn default() -> Self {
        Self::Disorder
    }
}

impl CynefinDomain {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Obvious => "obvious",
            Self::Complicated => "complicated",
            Self::Complex => "complex",
            Self::Chaotic => "chaotic",
            Self::Disorder => "disorder",
        }
    }

    pub const ALL: [CynefinDomain; 5] = [
        Self::Obvious,
        Self::Complicated,
        Self::Complex,
        Self::Chaotic,
        Self::Disorder,
    ];
}

/// The management style suited to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkParadigm {
    Task,
    Story,
    Epic,
    Experiment,
    Research,
    Incident,
}

impl WorkParadigm {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Story => "story",
            Self::Epic => "epic",
            Self::Experiment => "experiment",
            Self::Research => "research",
            Self::Incident => "incident",
        }
    }

    pub const ALL: [WorkParadigm; 6] = [
        Self::Task,
        Self::Story,
        Self::Epic,
        Self::Experiment,
        Self::Research,
        Self::Incident,
    ];
}

impl fmt::Display for CynefinDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WorkParadigm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CynefinDomain {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "obvious" => Ok(Self::Obvious),
            "complicated" => Ok(Self::Complicated),
            "complex" => Ok(Self::Complex),
            "chaotic" => Ok(Self::Chaotic),
            "disorder" => Ok(Self::Disorder),
            _ => Err(ParseEnumError {
                expected: "cynefin domain",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for WorkParadigm {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "story" => Ok(Self::Story),
            "epic" => Ok(Self::Epic),
            "experiment" => Ok(Self::Experiment),
            "research" => Ok(Self::Research),
            "incident" => Ok(Self::Incident),
            _ => Err(ParseEnumError {
                expected: "work paradigm",
                got: s.to_string(),
            }),
        }
    }
}

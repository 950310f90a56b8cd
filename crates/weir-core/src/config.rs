use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            workflow: WorkflowConfig::default(),
            store: StoreConfig::default(),
            tracker: TrackerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Require a comment when reopening a released item via the feedback
    /// edge. Enforced at the service facade, not inside the state machine.
    #[serde(default)]
    pub require_feedback_reason: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            require_feedback_reason: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Compare update timestamps on write and reject stale writers.
    /// Disable only in single-writer embeddings.
    #[serde(default = "default_true")]
    pub optimistic: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            optimistic: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Emit tracing events for every operation open/close.
    #[serde(default = "default_true")]
    pub log_operations: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            log_operations: default_true(),
        }
    }
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".weir/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_true() -> bool {
    true
}

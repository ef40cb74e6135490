//! Configuration loading and management
//!
//! Handles parsing of `.taskdash.toml` configuration files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::{TaskPriority, TaskStatus};
use crate::view::{SortDirection, SortKey, StatusFilter, ViewQuery};

pub const CONFIG_FILE: &str = ".taskdash.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Task store configuration
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Default view settings
    #[serde(default)]
    pub view: ViewConfig,
}

/// Tasks configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Task ID prefix
    #[serde(default = "default_task_id_prefix")]
    pub id_prefix: String,

    /// Reject blank titles, malformed due dates and negative time on create/update
    #[serde(default = "default_true")]
    pub validate: bool,

    /// Template used by quick-add
    #[serde(default)]
    pub defaults: TaskDefaultsConfig,
}

/// Field values for a quick-added task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefaultsConfig {
    #[serde(default = "default_task_title")]
    pub title: String,

    #[serde(default = "default_task_description")]
    pub description: String,

    #[serde(default = "default_task_assignee")]
    pub assignee: String,

    #[serde(default)]
    pub priority: TaskPriority,

    #[serde(default)]
    pub status: TaskStatus,
}

/// View configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Status filter: `all` or a task status
    #[serde(default = "default_view_status")]
    pub status: String,

    /// Sort key: title, priority, status, dueDate
    #[serde(default = "default_view_sort")]
    pub sort: String,

    /// Sort direction: asc or desc
    #[serde(default = "default_view_direction")]
    pub direction: String,
}

fn default_true() -> bool {
    true
}

fn default_task_id_prefix() -> String {
    "task".to_string()
}

fn default_task_title() -> String {
    "New Task".to_string()
}

fn default_task_description() -> String {
    "Task description".to_string()
}

fn default_task_assignee() -> String {
    "Unassigned".to_string()
}

fn default_view_status() -> String {
    "all".to_string()
}

fn default_view_sort() -> String {
    "dueDate".to_string()
}

fn default_view_direction() -> String {
    "asc".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_task_id_prefix(),
            validate: true,
            defaults: TaskDefaultsConfig::default(),
        }
    }
}

impl Default for TaskDefaultsConfig {
    fn default() -> Self {
        Self {
            title: default_task_title(),
            description: default_task_description(),
            assignee: default_task_assignee(),
            priority: TaskPriority::default(),
            status: TaskStatus::default(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            status: default_view_status(),
            sort: default_view_sort(),
            direction: default_view_direction(),
        }
    }
}

impl Config {
    /// Load configuration from a `.taskdash.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, or `.taskdash.toml` in `dir`, or defaults.
    ///
    /// An explicit path must load cleanly; the implicit file falls back to
    /// defaults when it is invalid.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        Ok(Self::load_or_default(&dir.join(CONFIG_FILE)))
    }

    /// Load configuration from `path`, or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.tasks.validate()?;
        self.view.query()?;
        Ok(())
    }
}

impl TasksConfig {
    fn validate(&self) -> Result<()> {
        let prefix = self.id_prefix.trim();
        if prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "tasks.id_prefix cannot be empty".to_string(),
            ));
        }
        if !prefix.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(Error::InvalidConfig(
                "tasks.id_prefix must be alphanumeric".to_string(),
            ));
        }
        if self.defaults.title.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "tasks.defaults.title cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl ViewConfig {
    /// The configured default view query.
    pub fn query(&self) -> Result<ViewQuery> {
        let filter = self
            .status
            .parse::<StatusFilter>()
            .map_err(|err| Error::InvalidConfig(format!("view.status: {err}")))?;
        let sort_key = self
            .sort
            .parse::<SortKey>()
            .map_err(|err| Error::InvalidConfig(format!("view.sort: {err}")))?;
        let direction = self
            .direction
            .parse::<SortDirection>()
            .map_err(|err| Error::InvalidConfig(format!("view.direction: {err}")))?;
        Ok(ViewQuery {
            filter,
            sort_key,
            direction,
        })
    }
}

//! Scripted dashboard sessions.
//!
//! A session owns one in-memory [`TaskStore`] for its lifetime and applies
//! commands to it in order. Scripts are JSON Lines, one command per line:
//!
//! ```text
//! {"op":"create","ref":"a","task":{"title":"Ship","dueDate":"2024-03-01"}}
//! {"op":"quick_add"}
//! {"op":"update","ref":"a","task":{"title":"Ship v2","dueDate":"2024-03-02"}}
//! {"op":"delete","ref":"a"}
//! ```
//!
//! `ref` labels a created task so later lines can target it; `id` targets a
//! task directly. Not-found and rejected commands are reported and skipped.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Config, TaskDefaultsConfig};
use crate::error::{Error, Result};
use crate::store::TaskStore;
use crate::task::TaskDraft;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionCommand {
    Create {
        #[serde(default, rename = "ref")]
        label: Option<String>,
        task: TaskDraft,
    },
    QuickAdd {
        #[serde(default, rename = "ref")]
        label: Option<String>,
    },
    Update {
        #[serde(default, rename = "ref")]
        label: Option<String>,
        #[serde(default)]
        id: Option<String>,
        task: TaskDraft,
    },
    Delete {
        #[serde(default, rename = "ref")]
        label: Option<String>,
        #[serde(default)]
        id: Option<String>,
    },
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::Create { .. } => "create",
            SessionCommand::QuickAdd { .. } => "quick_add",
            SessionCommand::Update { .. } => "update",
            SessionCommand::Delete { .. } => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Applied,
    NotFound,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub line: usize,
    pub op: &'static str,
    pub outcome: StepOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct DashboardSession {
    store: TaskStore,
    defaults: TaskDefaultsConfig,
    labels: HashMap<String, String>,
    today: NaiveDate,
}

impl DashboardSession {
    pub fn new(config: &Config) -> Self {
        Self {
            store: TaskStore::new(&config.tasks),
            defaults: config.tasks.defaults.clone(),
            labels: HashMap::new(),
            today: Utc::now().date_naive(),
        }
    }

    /// Fix the date used by quick-add.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn into_store(self) -> TaskStore {
        self.store
    }

    /// Parse and apply every command in `script`.
    pub fn replay(&mut self, script: &str) -> Result<Vec<StepReport>> {
        let commands = parse_script(script)?;
        let mut reports = Vec::with_capacity(commands.len());
        for (line, command) in commands {
            reports.push(self.apply(line, command)?);
        }
        Ok(reports)
    }

    /// Apply one command. Recoverable store errors become a report; anything
    /// else aborts.
    pub fn apply(&mut self, line: usize, command: SessionCommand) -> Result<StepReport> {
        let op = command.name();
        let result = match command {
            SessionCommand::Create { label, task } => {
                self.ensure_label_free(line, label.as_deref())?;
                self.store.create(task).map(|record| {
                    self.bind(label, &record.id);
                    record.id
                })
            }
            SessionCommand::QuickAdd { label } => {
                self.ensure_label_free(line, label.as_deref())?;
                self.store
                    .quick_add(&self.defaults, self.today)
                    .map(|record| {
                        self.bind(label, &record.id);
                        record.id
                    })
            }
            SessionCommand::Update { label, id, task } => {
                let id = self.resolve_target(line, label, id)?;
                self.store.update(task.into_record(id.clone())).map(|_| id)
            }
            SessionCommand::Delete { label, id } => {
                let id = self.resolve_target(line, label, id)?;
                self.store.delete(&id).map(|_| id)
            }
        };

        match result {
            Ok(id) => Ok(StepReport {
                line,
                op,
                outcome: StepOutcome::Applied,
                id: Some(id),
                message: None,
            }),
            Err(err) if err.is_recoverable() => {
                let (outcome, id) = match &err {
                    Error::TaskNotFound(id) => (StepOutcome::NotFound, Some(id.clone())),
                    _ => (StepOutcome::Rejected, None),
                };
                tracing::warn!(line, op, error = %err, "session step skipped");
                Ok(StepReport {
                    line,
                    op,
                    outcome,
                    id,
                    message: Some(err.to_string()),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn bind(&mut self, label: Option<String>, id: &str) {
        if let Some(label) = label {
            self.labels.insert(label, id.to_string());
        }
    }

    fn ensure_label_free(&self, line: usize, label: Option<&str>) -> Result<()> {
        match label {
            Some(label) if label.trim().is_empty() => Err(Error::InvalidArgument(format!(
                "line {line}: ref cannot be empty"
            ))),
            Some(label) if self.labels.contains_key(label) => Err(Error::InvalidArgument(format!(
                "line {line}: ref '{label}' is already bound"
            ))),
            _ => Ok(()),
        }
    }

    fn resolve_target(
        &self,
        line: usize,
        label: Option<String>,
        id: Option<String>,
    ) -> Result<String> {
        match (label, id) {
            (Some(label), None) => self.labels.get(&label).cloned().ok_or_else(|| {
                Error::InvalidArgument(format!("line {line}: unknown ref '{label}'"))
            }),
            (None, Some(id)) => Ok(id),
            (Some(_), Some(_)) => Err(Error::InvalidArgument(format!(
                "line {line}: use either ref or id, not both"
            ))),
            (None, None) => Err(Error::InvalidArgument(format!(
                "line {line}: missing ref or id"
            ))),
        }
    }
}

/// Parse a JSON Lines script into `(line number, command)` pairs. Blank lines
/// and lines starting with `#` are skipped.
pub fn parse_script(script: &str) -> Result<Vec<(usize, SessionCommand)>> {
    let mut commands = Vec::new();
    for (idx, raw) in script.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command: SessionCommand = serde_json::from_str(line).map_err(|err| {
            Error::InvalidArgument(format!("line {}: invalid session command: {err}", idx + 1))
        })?;
        commands.push((idx + 1, command));
    }
    Ok(commands)
}

/// Read a script from `path`, or from stdin when `path` is `-`.
pub fn read_script(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(std::fs::read_to_string(path)?)
}

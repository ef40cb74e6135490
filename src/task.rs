//! Task records and their field rules.
//!
//! A [`TaskRecord`] is a plain value: the store owns the authoritative copy and
//! hands out clones. [`TaskDraft`] is the same record before an id is assigned.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
const DUE_DATE_LEN: usize = 10;

/// Declaration order is the sort order: `low < medium < high`.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(Error::InvalidArgument(format!(
                "invalid priority '{other}' (expected low|medium|high)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(Error::InvalidArgument(format!(
                "invalid status '{other}' (expected todo|in-progress|done)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assignee: String,
    /// `YYYY-MM-DD`; lexicographic order is chronological order.
    pub due_date: String,
    /// Hours.
    pub time_spent: f64,
}

impl TaskRecord {
    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            status: self.status,
            assignee: self.assignee.clone(),
            due_date: self.due_date.clone(),
            time_spent: self.time_spent,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.title, &self.due_date, self.time_spent)
    }
}

/// A task record without an id, as accepted by [`crate::store::TaskStore::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub assignee: String,
    pub due_date: String,
    #[serde(default)]
    pub time_spent: f64,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: TaskPriority::default(),
            status: TaskStatus::default(),
            assignee: String::new(),
            due_date: due_date.into(),
            time_spent: 0.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }

    pub fn with_time_spent(mut self, hours: f64) -> Self {
        self.time_spent = hours;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.title, &self.due_date, self.time_spent)
    }

    pub fn into_record(self, id: String) -> TaskRecord {
        TaskRecord {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            assignee: self.assignee,
            due_date: self.due_date,
            time_spent: self.time_spent,
        }
    }
}

pub fn validate_fields(title: &str, due_date: &str, time_spent: f64) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidField {
            field: "title",
            reason: "cannot be empty".to_string(),
        });
    }
    parse_due_date(due_date)?;
    if !time_spent.is_finite() || time_spent < 0.0 {
        return Err(Error::InvalidField {
            field: "timeSpent",
            reason: format!("must be a non-negative number of hours, got {time_spent}"),
        });
    }
    Ok(())
}

/// Parse a strict `YYYY-MM-DD` date. Shorter or padded forms chrono would
/// otherwise accept are rejected so string order stays chronological.
pub fn parse_due_date(value: &str) -> Result<NaiveDate> {
    let well_formed = value.len() == DUE_DATE_LEN
        && value.bytes().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !well_formed {
        return Err(Error::InvalidField {
            field: "dueDate",
            reason: format!("'{value}' is not a YYYY-MM-DD date"),
        });
    }
    NaiveDate::parse_from_str(value, DUE_DATE_FORMAT).map_err(|err| Error::InvalidField {
        field: "dueDate",
        reason: format!("'{value}' is not a calendar date: {err}"),
    })
}

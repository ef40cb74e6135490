//! Filtered and sorted views over a task collection.
//!
//! [`project_view`] is a pure function of its inputs. [`ViewCache`] memoizes
//! it per store version for callers that re-render often.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::TaskStore;
use crate::task::{TaskRecord, TaskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(self, task: &TaskRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" | "show all" | "show-all" => Ok(StatusFilter::All),
            other => other.parse::<TaskStatus>().map(StatusFilter::Only),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Title,
    Priority,
    Status,
    #[default]
    DueDate,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Priority => "priority",
            SortKey::Status => "status",
            SortKey::DueDate => "dueDate",
        }
    }

    /// Priority compares by rank; every other key compares its string form.
    pub fn compare(self, left: &TaskRecord, right: &TaskRecord) -> Ordering {
        match self {
            SortKey::Title => left.title.cmp(&right.title),
            SortKey::Priority => left.priority.cmp(&right.priority),
            SortKey::Status => left.status.as_str().cmp(right.status.as_str()),
            SortKey::DueDate => left.due_date.cmp(&right.due_date),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortKey::Title),
            "priority" => Ok(SortKey::Priority),
            "status" => Ok(SortKey::Status),
            "duedate" | "due-date" | "due_date" => Ok(SortKey::DueDate),
            other => Err(Error::InvalidArgument(format!(
                "invalid sort key '{other}' (expected title|priority|status|dueDate)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(Error::InvalidArgument(format!(
                "invalid sort direction '{other}' (expected asc|desc)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ViewQuery {
    pub filter: StatusFilter,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl ViewQuery {
    pub fn new(filter: StatusFilter, sort_key: SortKey, direction: SortDirection) -> Self {
        Self {
            filter,
            sort_key,
            direction,
        }
    }
}

/// Filter by status, then stable-sort by the query's key and direction.
/// Records that compare equal keep their relative input order.
pub fn project_view(tasks: &[TaskRecord], query: &ViewQuery) -> Vec<TaskRecord> {
    let mut view: Vec<TaskRecord> = tasks
        .iter()
        .filter(|task| query.filter.matches(task))
        .cloned()
        .collect();
    view.sort_by(|left, right| query.direction.apply(query.sort_key.compare(left, right)));
    view
}

/// Memoized [`project_view`] keyed on store identity, store version and query.
#[derive(Debug, Default)]
pub struct ViewCache {
    entries: HashMap<(u64, u64, ViewQuery), Vec<TaskRecord>>,
    pub hits: u64,
    pub misses: u64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&mut self, store: &TaskStore, query: &ViewQuery) -> Vec<TaskRecord> {
        let store_id = store.store_id();
        let version = store.version();
        // Only the latest version of the store being viewed is kept.
        self.entries.retain(|(cached_store, cached_version, _), _| {
            *cached_store == store_id && *cached_version == version
        });
        let key = (store_id, version, *query);
        if let Some(view) = self.entries.get(&key) {
            self.hits += 1;
            tracing::trace!(store_id, version, ?query, "view cache hit");
            return view.clone();
        }
        self.misses += 1;
        tracing::trace!(store_id, version, ?query, "view cache miss");
        let view = project_view(&store.list(), query);
        self.entries.insert(key, view.clone());
        view
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//! In-memory task store.
//!
//! The store is the only owner of the task collection. Records are kept in
//! insertion order, ids are assigned on create and never change, and every
//! read hands out clones so callers cannot reach the stored records.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::Serialize;
use ulid::Generator;

use crate::config::{TaskDefaultsConfig, TasksConfig};
use crate::error::{Error, Result};
use crate::task::{TaskDraft, TaskRecord, DUE_DATE_FORMAT};

/// A read-only copy of the collection at one store version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSnapshot {
    pub version: u64,
    pub tasks: Vec<TaskRecord>,
}

impl TaskSnapshot {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

pub struct TaskStore {
    store_id: u64,
    tasks: Vec<TaskRecord>,
    id_prefix: String,
    validate: bool,
    ids: Generator,
    version: u64,
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("store_id", &self.store_id)
            .field("tasks", &self.tasks)
            .field("id_prefix", &self.id_prefix)
            .field("validate", &self.validate)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(&TasksConfig::default())
    }
}

impl TaskStore {
    pub fn new(config: &TasksConfig) -> Self {
        Self {
            store_id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            tasks: Vec::new(),
            id_prefix: config.id_prefix.trim().to_string(),
            validate: config.validate,
            ids: Generator::new(),
            version: 0,
        }
    }

    /// Process-unique identity of this store.
    pub fn store_id(&self) -> u64 {
        self.store_id
    }

    /// Bumped on every successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Insert a new record at the end of the collection and return it with its id.
    pub fn create(&mut self, draft: TaskDraft) -> Result<TaskRecord> {
        if self.validate {
            draft.validate()?;
        }
        let id = self.next_id()?;
        let record = draft.into_record(id);
        self.tasks.push(record.clone());
        self.version += 1;
        tracing::debug!(id = %record.id, version = self.version, "task created");
        Ok(record)
    }

    /// Create a task from the quick-add template, due `today`.
    pub fn quick_add(
        &mut self,
        defaults: &TaskDefaultsConfig,
        today: NaiveDate,
    ) -> Result<TaskRecord> {
        let draft = TaskDraft::new(
            defaults.title.clone(),
            today.format(DUE_DATE_FORMAT).to_string(),
        )
        .with_description(defaults.description.clone())
        .with_assignee(defaults.assignee.clone())
        .with_priority(defaults.priority)
        .with_status(defaults.status);
        self.create(draft)
    }

    /// Replace the record with `record.id` in place. Every field is taken from
    /// `record`; nothing is merged.
    pub fn update(&mut self, record: TaskRecord) -> Result<TaskSnapshot> {
        let Some(position) = self.position(&record.id) else {
            tracing::debug!(id = %record.id, "update target not found");
            return Err(Error::TaskNotFound(record.id));
        };
        if self.validate {
            record.validate()?;
        }
        tracing::debug!(id = %record.id, position, "task updated");
        self.tasks[position] = record;
        self.version += 1;
        Ok(self.snapshot())
    }

    pub fn delete(&mut self, id: &str) -> Result<TaskSnapshot> {
        let Some(position) = self.position(id) else {
            tracing::debug!(id, "delete target not found");
            return Err(Error::TaskNotFound(id.to_string()));
        };
        self.tasks.remove(position);
        self.version += 1;
        tracing::debug!(id, version = self.version, "task deleted");
        Ok(self.snapshot())
    }

    /// The collection in insertion order.
    pub fn list(&self) -> Vec<TaskRecord> {
        self.tasks.clone()
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            version: self.version,
            tasks: self.list(),
        }
    }

    pub fn get(&self, id: &str) -> Option<TaskRecord> {
        self.tasks.iter().find(|task| task.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Ids are `<prefix>-<ulid>` from the store's monotonic generator, so
    /// they are strictly increasing even within one millisecond.
    fn next_id(&mut self) -> Result<String> {
        let ulid = self
            .ids
            .generate()
            .map_err(|err| Error::OperationFailed(format!("task id generation failed: {err}")))?;
        Ok(format!(
            "{}-{}",
            self.id_prefix,
            ulid.to_string().to_ascii_lowercase()
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::task::{TaskPriority, TaskStatus};

    fn draft(title: &str, due: &str) -> TaskDraft {
        TaskDraft::new(title, due)
    }

    #[test]
    fn create_assigns_unique_prefixed_ids() {
        let mut store = TaskStore::default();
        let mut ids = HashSet::new();
        for idx in 0..500 {
            let record = store
                .create(draft(&format!("t{idx}"), "2024-01-01"))
                .expect("create");
            assert!(record.id.starts_with("task-"));
            assert!(ids.insert(record.id));
        }
        assert_eq!(store.len(), 500);
    }

    #[test]
    fn ids_increase_in_creation_order() {
        let mut store = TaskStore::default();
        let ids: Vec<String> = (0..50)
            .map(|_| store.create(draft("t", "2024-01-01")).expect("create").id)
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn stores_have_distinct_identities() {
        let first = TaskStore::default();
        let second = TaskStore::default();
        assert_ne!(first.store_id(), second.store_id());
        assert_eq!(first.version(), second.version());
    }

    #[test]
    fn create_appends_in_insertion_order() {
        let mut store = TaskStore::default();
        let a = store.create(draft("A", "2024-02-01")).expect("a");
        let b = store.create(draft("B", "2024-01-01")).expect("b");
        let listed: Vec<String> = store.list().into_iter().map(|t| t.id).collect();
        assert_eq!(listed, vec![a.id, b.id]);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn update_replaces_whole_record_in_place() {
        let mut store = TaskStore::default();
        let first = store.create(draft("First", "2024-01-01")).expect("first");
        let second = store
            .create(draft("Second", "2024-01-02").with_assignee("Ana"))
            .expect("second");
        let third = store.create(draft("Third", "2024-01-03")).expect("third");

        let replacement = draft("Second v2", "2024-02-02")
            .with_priority(TaskPriority::High)
            .with_status(TaskStatus::Done)
            .into_record(second.id.clone());
        let snapshot = store.update(replacement.clone()).expect("update");

        assert_eq!(snapshot.tasks, vec![first, replacement, third]);
        assert_eq!(snapshot.tasks[1].assignee, "");
        assert_eq!(snapshot.version, store.version());
    }

    #[test]
    fn update_unknown_id_is_not_found_and_leaves_store() {
        let mut store = TaskStore::default();
        store.create(draft("Only", "2024-01-01")).expect("create");
        let before = store.snapshot();

        let err = store
            .update(draft("Ghost", "2024-01-01").into_record("task-missing".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(ref id) if id == "task-missing"));
        assert!(err.is_recoverable());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut store = TaskStore::default();
        let a = store.create(draft("A", "2024-01-01")).expect("a");
        let b = store.create(draft("B", "2024-01-01")).expect("b");

        let snapshot = store.delete(&a.id).expect("delete");
        assert_eq!(snapshot.tasks, vec![b.clone()]);

        let err = store.delete(&a.id).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(_)));
        assert_eq!(store.list(), vec![b]);
    }

    #[test]
    fn list_is_a_copy() {
        let mut store = TaskStore::default();
        store.create(draft("A", "2024-01-01")).expect("a");
        let mut listed = store.list();
        listed[0].title = "mutated".to_string();
        listed.clear();
        assert_eq!(store.list()[0].title, "A");
    }

    #[test]
    fn validation_rejects_without_mutation() {
        let mut store = TaskStore::default();
        assert!(matches!(
            store.create(draft("", "2024-01-01")).unwrap_err(),
            Error::InvalidField { field: "title", .. }
        ));
        let kept = store.create(draft("Kept", "2024-01-01")).expect("create");
        let mut bad = kept.clone();
        bad.due_date = "tomorrow".to_string();
        assert!(matches!(
            store.update(bad).unwrap_err(),
            Error::InvalidField {
                field: "dueDate",
                ..
            }
        ));
        assert_eq!(store.list(), vec![kept]);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn validation_can_be_disabled() {
        let config = TasksConfig {
            validate: false,
            ..TasksConfig::default()
        };
        let mut store = TaskStore::new(&config);
        let record = store.create(draft("", "someday")).expect("lenient create");
        assert_eq!(record.due_date, "someday");
    }

    #[test]
    fn quick_add_uses_template_and_today() {
        let mut store = TaskStore::default();
        let today = NaiveDate::from_ymd_opt(2024, 6, 9).expect("date");
        let record = store
            .quick_add(&TaskDefaultsConfig::default(), today)
            .expect("quick add");
        assert_eq!(record.title, "New Task");
        assert_eq!(record.description, "Task description");
        assert_eq!(record.assignee, "Unassigned");
        assert_eq!(record.priority, TaskPriority::Medium);
        assert_eq!(record.status, TaskStatus::Todo);
        assert_eq!(record.due_date, "2024-06-09");
        assert_eq!(record.time_spent, 0.0);
    }

    #[test]
    fn get_returns_copy() {
        let mut store = TaskStore::default();
        let a = store.create(draft("A", "2024-01-01")).expect("a");
        assert_eq!(store.get(&a.id), Some(a.clone()));
        assert!(store.contains(&a.id));
        assert_eq!(store.get("nope"), None);
    }
}

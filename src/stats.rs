//! Dashboard summary counts.

use serde::Serialize;

use crate::task::{TaskRecord, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    /// One entry per status in `todo, in-progress, done` order, zeros included.
    pub statuses: Vec<StatusCount>,
}

impl DashboardStats {
    pub fn count(&self, status: TaskStatus) -> usize {
        self.statuses
            .iter()
            .find(|entry| entry.status == status)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

pub fn compute(tasks: &[TaskRecord]) -> DashboardStats {
    let statuses = TaskStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: tasks.iter().filter(|task| task.status == status).count(),
        })
        .collect();
    DashboardStats {
        total: tasks.len(),
        statuses,
    }
}

pub fn format_status_counts(counts: &[StatusCount]) -> String {
    counts
        .iter()
        .map(|entry| format!("{}={}", entry.status, entry.count))
        .collect::<Vec<_>>()
        .join(", ")
}

//! Due-date trend series.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::task::TaskRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub count: usize,
}

/// Count tasks per distinct due date, oldest date first.
///
/// Dates with no tasks are absent rather than reported as zero.
pub fn aggregate_trend(tasks: &[TaskRecord]) -> Vec<TrendPoint> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for task in tasks {
        *counts.entry(task.due_date.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| TrendPoint {
            date: date.to_string(),
            count,
        })
        .collect()
}

//! Dashboard counters derived from the task list.

use crate::model::{Priority, Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub high_priority: usize,
    pub overdue: usize,
}

impl TaskStats {
    /// Fraction of tasks completed, `0.0` for an empty list.
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Count tasks by status and priority, and those overdue as of `now`.
pub fn compute_stats(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    tasks.iter().fold(TaskStats::default(), |mut stats, task| {
        stats.total += 1;
        match task.status {
            TaskStatus::Pending => stats.pending += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Completed => stats.completed += 1,
        }
        if task.priority == Priority::High {
            stats.high_priority += 1;
        }
        if task.is_overdue(now) {
            stats.overdue += 1;
        }
        stats
    })
}

/// [`compute_stats`] against the current time.
pub fn compute_stats_now(tasks: &[Task]) -> TaskStats {
    compute_stats(tasks, Utc::now())
}

//! Status and free-text filtering for task lists.

use crate::error::ParseError;
use crate::model::{Task, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    InProgress,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == TaskStatus::Pending,
            StatusFilter::InProgress => status == TaskStatus::InProgress,
            StatusFilter::Completed => status == TaskStatus::Completed,
        }
    }
}

impl From<TaskStatus> for StatusFilter {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => StatusFilter::Pending,
            TaskStatus::InProgress => StatusFilter::InProgress,
            TaskStatus::Completed => StatusFilter::Completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Pending => f.write_str("pending"),
            StatusFilter::InProgress => f.write_str("in_progress"),
            StatusFilter::Completed => f.write_str("completed"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<TaskStatus>()
            .map(StatusFilter::from)
            .map_err(|_| ParseError::StatusFilter(s.to_string()))
    }
}

/// Keep the tasks matching both the status filter and the search query.
///
/// A blank query matches everything. Otherwise the trimmed query must appear,
/// ignoring case, in the title, the description or the assignee. Relative
/// order is preserved.
pub fn filter_tasks(tasks: &[Task], query: &str, status: StatusFilter) -> Vec<Task> {
    let needle = query.trim().to_lowercase();
    tasks
        .iter()
        .filter(|task| status.matches(task.status))
        .filter(|task| needle.is_empty() || task.matches_lowercase(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::{TimeZone, Utc};

    fn task(id: &str, title: &str, description: Option<&str>, assignee: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            due_date: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            priority: Priority::Medium,
            status,
            created_by: assignee.to_string(),
            assigned_to: assignee.to_string(),
            tenant_id: None,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", "Ship release", None, "a@x.com", TaskStatus::Pending),
            task("2", "Write docs", Some("Cover the SHIPPING guide"), "b@x.com", TaskStatus::Completed),
            task("3", "Review PR", None, "ship.master@x.com", TaskStatus::InProgress),
            task("4", "Plan sprint", Some("quarterly"), "c@x.com", TaskStatus::Pending),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_blank_query_and_all_returns_input() {
        let tasks = sample();
        assert_eq!(filter_tasks(&tasks, "", StatusFilter::All), tasks);
        assert_eq!(filter_tasks(&tasks, "   ", StatusFilter::All), tasks);
    }

    #[test]
    fn test_title_search_is_case_insensitive() {
        let tasks = vec![
            task("1", "Ship release", None, "a@x.com", TaskStatus::Pending),
            task("2", "Write docs", None, "b@x.com", TaskStatus::Pending),
        ];
        assert_eq!(ids(&filter_tasks(&tasks, "ship", StatusFilter::All)), vec!["1"]);
    }

    #[test]
    fn test_search_covers_description_and_assignee() {
        let tasks = sample();
        assert_eq!(ids(&filter_tasks(&tasks, "  SHIP ", StatusFilter::All)), vec!["1", "2", "3"]);
        assert_eq!(ids(&filter_tasks(&tasks, "quarter", StatusFilter::All)), vec!["4"]);
        assert!(filter_tasks(&tasks, "nothing matches", StatusFilter::All).is_empty());
    }

    #[test]
    fn test_status_and_query_are_conjunctive() {
        let tasks = sample();
        assert_eq!(ids(&filter_tasks(&tasks, "", StatusFilter::Pending)), vec!["1", "4"]);
        assert_eq!(ids(&filter_tasks(&tasks, "ship", StatusFilter::Pending)), vec!["1"]);
        assert_eq!(ids(&filter_tasks(&tasks, "ship", StatusFilter::InProgress)), vec!["3"]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let tasks = sample();
        for filter in [
            StatusFilter::All,
            StatusFilter::Pending,
            StatusFilter::InProgress,
            StatusFilter::Completed,
        ] {
            for query in ["", "ship", "x.com", "docs"] {
                let once = filter_tasks(&tasks, query, filter);
                let twice = filter_tasks(&once, query, filter);
                assert_eq!(once, twice, "filter={filter} query={query}");
            }
        }
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("in_progress".parse::<StatusFilter>(), Ok(StatusFilter::InProgress));
        assert_eq!("in-progress".parse::<StatusFilter>(), Ok(StatusFilter::InProgress));
        assert!(matches!(
            "archived".parse::<StatusFilter>(),
            Err(ParseError::StatusFilter(_))
        ));
        assert_eq!(StatusFilter::InProgress.to_string(), "in_progress");
    }
}

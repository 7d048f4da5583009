//! Task and user records as exchanged with the Taskz backend.

use crate::error::ParseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Capitalized label used in task tables.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParseError::Priority(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Label shown to users. Pending tasks are presented as upcoming work.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Upcoming",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(ParseError::Status(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Normal,
    Admin,
    /// Any role this client does not know about.
    #[serde(other)]
    Other,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Normal => "normal",
            Role::Admin => "admin",
            Role::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub user_email: String,
    pub user_name: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "crate::wire_time")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "crate::wire_time")]
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(default)]
    pub created_by: String,
    pub assigned_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl Task {
    /// Past due and not yet completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now && self.status != TaskStatus::Completed
    }

    /// Case-insensitive substring match over title, description and assignee.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(needle))
            || self.assigned_to.to_lowercase().contains(needle)
    }
}

/// Payload for `POST /tasks/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "crate::wire_time")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "crate::wire_time")]
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub created_by: String,
    pub assigned_to: String,
}

/// Partial update for `PUT /tasks/{id}`.
///
/// Only fields that are `Some` are sent. `description` has a third state:
/// `Some(None)` is sent as an explicit `null` to clear it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::wire_time::option"
    )]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "crate::wire_time::option"
    )]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// Payload for `POST /users/` (sign-up).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub user_email: String,
    pub user_name: String,
    pub pwd: String,
    #[serde(default)]
    pub role: Role,
}

impl NewUser {
    pub fn new(
        user_email: impl Into<String>,
        user_name: impl Into<String>,
        pwd: impl Into<String>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            user_name: user_name.into(),
            pwd: pwd.into(),
            role: Role::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_task() -> Task {
        Task {
            id: "t-1".to_string(),
            title: "Ship release".to_string(),
            description: Some("Tag and publish".to_string()),
            start_date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            due_date: Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap(),
            priority: Priority::High,
            status: TaskStatus::InProgress,
            created_by: "a@x.com".to_string(),
            assigned_to: "a@x.com".to_string(),
            tenant_id: None,
        }
    }

    #[test]
    fn test_task_decodes_backend_payload() {
        let task: Task = serde_json::from_value(json!({
            "id": "t-1",
            "title": "Ship release",
            "description": null,
            "start_date": "2024-05-01T09:00:00",
            "due_date": "2024-05-02T09:00:00",
            "priority": "high",
            "status": "in_progress",
            "created_by": "a@x.com",
            "assigned_to": "a@x.com",
            "tenant_id": "tenant-1"
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.description, None);
        assert_eq!(task.tenant_id.as_deref(), Some("tenant-1"));
        assert_eq!(
            task.due_date,
            Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unknown_role_decodes_as_other() {
        let user: User = serde_json::from_value(json!({
            "id": "u-1",
            "user_email": "a@x.com",
            "user_name": "Ann",
            "role": "auditor"
        }))
        .unwrap();
        assert_eq!(user.role, Role::Other);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..TaskPatch::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "status": "completed" })
        );
    }

    #[test]
    fn test_patch_distinguishes_cleared_description() {
        let unchanged = TaskPatch::default();
        let cleared = TaskPatch {
            description: Some(None),
            ..TaskPatch::default()
        };

        assert_eq!(serde_json::to_value(&unchanged).unwrap(), json!({}));
        assert_eq!(
            serde_json::to_value(&cleared).unwrap(),
            json!({ "description": null })
        );
    }

    #[test]
    fn test_status_parsing_and_labels() {
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!(" Completed ".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("done".parse::<TaskStatus>().is_err());
        assert_eq!(TaskStatus::Pending.label(), "Upcoming");
        assert_eq!(Priority::High.label(), "High");
        assert_eq!("LOW".parse::<Priority>(), Ok(Priority::Low));
    }

    #[test]
    fn test_new_user_defaults_to_normal_role() {
        let user = NewUser::new("b@x.com", "Bea", "secret1");
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({
                "user_email": "b@x.com",
                "user_name": "Bea",
                "pwd": "secret1",
                "role": "normal"
            })
        );
    }
}

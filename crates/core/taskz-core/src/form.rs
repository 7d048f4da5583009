//! Task form state and conversion to request payloads.
//!
//! The form edits dates as local wall-clock values with minute precision
//! (`YYYY-MM-DDTHH:mm`), while the backend exchanges UTC instants. All
//! conversions take the local time zone as a parameter; callers normally pass
//! [`chrono::Local`].

use crate::error::FormError;
use crate::model::{NewTask, Priority, Task, TaskPatch, TaskStatus};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

pub const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const LOCAL_INPUT_FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// Render an instant as a local `YYYY-MM-DDTHH:mm` value.
pub fn to_local_input<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant
        .with_timezone(tz)
        .format(LOCAL_INPUT_FORMAT)
        .to_string()
}

/// Parse a local `YYYY-MM-DDTHH:mm` value back into a UTC instant.
///
/// Seconds are accepted but optional. A wall-clock time that occurs twice
/// (end of daylight saving) resolves to the earlier instant.
pub fn from_local_input<Tz: TimeZone>(
    field: &'static str,
    value: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, FormError> {
    let trimmed = value.trim();
    let naive = NaiveDateTime::parse_from_str(trimmed, LOCAL_INPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, LOCAL_INPUT_FORMAT_WITH_SECONDS))
        .map_err(|_| FormError::invalid_date(field, value))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| FormError::NonexistentLocalTime {
            field,
            value: trimmed.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub due_date: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub assigned_to: String,
}

impl TaskForm {
    /// Blank form for a new task: starts now, due a day later, assigned to
    /// the current user.
    pub fn new_task<Tz>(now: DateTime<Utc>, current_user_email: &str, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            title: String::new(),
            description: String::new(),
            start_date: to_local_input(&now, tz),
            due_date: to_local_input(&(now + Duration::hours(24)), tz),
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            assigned_to: current_user_email.to_string(),
        }
    }

    /// Form pre-filled from an existing task.
    pub fn for_task<Tz>(task: &Task, current_user_email: &str, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let assigned_to = if task.assigned_to.trim().is_empty() {
            current_user_email.to_string()
        } else {
            task.assigned_to.clone()
        };

        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            start_date: to_local_input(&task.start_date, tz),
            due_date: to_local_input(&task.due_date, tz),
            priority: task.priority,
            status: task.status,
            assigned_to,
        }
    }

    /// Presence check for the required fields.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::MissingField("title"));
        }
        if self.start_date.trim().is_empty() {
            return Err(FormError::MissingField("start_date"));
        }
        if self.due_date.trim().is_empty() {
            return Err(FormError::MissingField("due_date"));
        }
        Ok(())
    }

    fn description(&self) -> Option<String> {
        let description = self.description.trim();
        (!description.is_empty()).then(|| description.to_string())
    }

    fn dates<Tz: TimeZone>(&self, tz: &Tz) -> Result<(DateTime<Utc>, DateTime<Utc>), FormError> {
        Ok((
            from_local_input("start_date", &self.start_date, tz)?,
            from_local_input("due_date", &self.due_date, tz)?,
        ))
    }

    /// Payload for creating a task on behalf of `created_by`.
    pub fn into_new_task<Tz: TimeZone>(self, created_by: &str, tz: &Tz) -> Result<NewTask, FormError> {
        self.validate()?;
        let (start_date, due_date) = self.dates(tz)?;
        let description = self.description();

        Ok(NewTask {
            title: self.title.trim().to_string(),
            description,
            start_date,
            due_date,
            priority: self.priority,
            status: self.status,
            created_by: created_by.to_string(),
            assigned_to: self.assigned_to,
        })
    }

    /// Payload for updating a task. Every field the form edits is sent; a
    /// blank description is sent as an explicit clear.
    pub fn into_patch<Tz: TimeZone>(self, tz: &Tz) -> Result<TaskPatch, FormError> {
        self.validate()?;
        let (start_date, due_date) = self.dates(tz)?;
        let description = self.description();

        Ok(TaskPatch {
            title: Some(self.title.trim().to_string()),
            description: Some(description),
            start_date: Some(start_date),
            due_date: Some(due_date),
            priority: Some(self.priority),
            status: Some(self.status),
            assigned_to: Some(self.assigned_to),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    fn plus_two() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn task() -> Task {
        Task {
            id: "t-1".to_string(),
            title: "Ship release".to_string(),
            description: None,
            start_date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            due_date: Utc.with_ymd_and_hms(2024, 5, 3, 22, 15, 42).unwrap(),
            priority: Priority::High,
            status: TaskStatus::InProgress,
            created_by: "a@x.com".to_string(),
            assigned_to: "b@x.com".to_string(),
            tenant_id: None,
        }
    }

    #[test]
    fn test_local_rendering_uses_time_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
        assert_eq!(to_local_input(&instant, &Utc), "2024-05-01T23:30");
        assert_eq!(to_local_input(&instant, &plus_two()), "2024-05-02T01:30");
    }

    #[test]
    fn test_round_trip_to_minute_precision() {
        let due = task().due_date;
        for tz in [plus_two(), FixedOffset::west_opt(5 * 3600 + 1800).unwrap()] {
            let local = to_local_input(&due, &tz);
            let back = from_local_input("due_date", &local, &tz).unwrap();
            assert_eq!(back, due.with_second(0).unwrap());
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = from_local_input("start_date", "05/01/2024", &Utc).unwrap_err();
        assert_eq!(err, FormError::invalid_date("start_date", "05/01/2024"));
        assert!(from_local_input("start_date", "2024-05-01T10:00:30", &Utc).is_ok());
    }

    #[test]
    fn test_new_task_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 15).unwrap();
        let form = TaskForm::new_task(now, "me@x.com", &Utc);

        assert_eq!(form.start_date, "2024-05-01T09:30");
        assert_eq!(form.due_date, "2024-05-02T09:30");
        assert_eq!(form.priority, Priority::Medium);
        assert_eq!(form.status, TaskStatus::Pending);
        assert_eq!(form.assigned_to, "me@x.com");
        assert_eq!(form.validate(), Err(FormError::MissingField("title")));
    }

    #[test]
    fn test_edit_form_prefills_from_task() {
        let form = TaskForm::for_task(&task(), "me@x.com", &plus_two());
        assert_eq!(form.title, "Ship release");
        assert_eq!(form.description, "");
        assert_eq!(form.start_date, "2024-05-01T11:30");
        assert_eq!(form.due_date, "2024-05-04T00:15");
        assert_eq!(form.priority, Priority::High);
        assert_eq!(form.assigned_to, "b@x.com");

        let mut unassigned = task();
        unassigned.assigned_to = String::new();
        let form = TaskForm::for_task(&unassigned, "me@x.com", &plus_two());
        assert_eq!(form.assigned_to, "me@x.com");
    }

    #[test]
    fn test_create_payload() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let mut form = TaskForm::new_task(now, "me@x.com", &plus_two());
        form.title = "  Write docs ".to_string();
        form.description = "   ".to_string();

        let payload = form.into_new_task("me@x.com", &plus_two()).unwrap();
        assert_eq!(payload.title, "Write docs");
        assert_eq!(payload.description, None);
        assert_eq!(payload.start_date, now);
        assert_eq!(payload.due_date, now + Duration::hours(24));
        assert_eq!(payload.created_by, "me@x.com");
        assert_eq!(payload.assigned_to, "me@x.com");
    }

    #[test]
    fn test_update_payload_covers_form_fields_only() {
        let mut form = TaskForm::for_task(&task(), "me@x.com", &Utc);
        form.status = TaskStatus::Completed;

        let patch = form.into_patch(&Utc).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::Completed));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.start_date, Some(task().start_date));
        assert_eq!(patch.due_date, Some(task().due_date.with_second(0).unwrap()));
    }

    #[test]
    fn test_missing_dates_are_reported() {
        let mut form = TaskForm::for_task(&task(), "me@x.com", &Utc);
        form.due_date = " ".to_string();
        assert_eq!(
            form.into_patch(&Utc),
            Err(FormError::MissingField("due_date"))
        );
    }
}

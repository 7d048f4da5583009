//! Text rendering for dashboard cards, task tables and user lists.

use chrono::{DateTime, TimeZone, Utc};
use console::{Alignment, pad_str, style};
use std::fmt::Display;
use taskz_core::{Priority, Task, TaskStats, TaskStatus, User, greeting};

const TITLE_WIDTH: usize = 32;
const STATUS_WIDTH: usize = 12;
const PRIORITY_WIDTH: usize = 8;
const DATE_WIDTH: usize = 18;
const ASSIGNEE_WIDTH: usize = 24;

/// `Mon DD, YYYY HH:MM` in the given zone.
pub fn format_date<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.with_timezone(tz).format("%b %d, %Y %H:%M").to_string()
}

pub fn greeting_line(user_name: &str, hour: u32) -> String {
    format!("{}, {}!", greeting(hour), style(user_name).bold())
}

pub fn stats_cards(stats: &TaskStats) -> String {
    let cards = [
        ("Total", stats.total),
        ("Upcoming", stats.pending),
        ("In Progress", stats.in_progress),
        ("Completed", stats.completed),
        ("High Priority", stats.high_priority),
        ("Overdue", stats.overdue),
    ];

    let mut out = String::new();
    for (label, value) in cards {
        let value = value.to_string();
        let value = if label == "Overdue" && stats.overdue > 0 {
            style(value).red().bold().to_string()
        } else {
            style(value).bold().to_string()
        };
        out.push_str(&format!("{} {}\n", pad_str(label, 14, Alignment::Left, None), value));
    }
    out.push_str(&format!(
        "{} {:.0}%\n",
        pad_str("Done", 14, Alignment::Left, None),
        stats.completion_ratio() * 100.0
    ));
    out
}

fn cell(text: &str, width: usize) -> String {
    pad_str(text, width, Alignment::Left, Some("…")).into_owned()
}

fn status_cell(status: TaskStatus) -> String {
    let text = cell(status.label(), STATUS_WIDTH);
    match status {
        TaskStatus::Pending => style(text).yellow().to_string(),
        TaskStatus::InProgress => style(text).cyan().to_string(),
        TaskStatus::Completed => style(text).green().to_string(),
    }
}

fn priority_cell(priority: Priority) -> String {
    let text = cell(priority.label(), PRIORITY_WIDTH);
    match priority {
        Priority::High => style(text).red().to_string(),
        Priority::Medium => text,
        Priority::Low => style(text).dim().to_string(),
    }
}

pub fn task_table<Tz>(tasks: &[Task], now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let mut out = format!(
        "{}\n",
        style(format!(
            "{} {} {} {} {} ID",
            cell("Title", TITLE_WIDTH),
            cell("Status", STATUS_WIDTH),
            cell("Priority", PRIORITY_WIDTH),
            cell("Due", DATE_WIDTH),
            cell("Assigned To", ASSIGNEE_WIDTH),
        ))
        .bold()
    );

    for task in tasks {
        let due = cell(&format_date(&task.due_date, tz), DATE_WIDTH);
        let due = if task.is_overdue(now) {
            style(due).red().to_string()
        } else {
            due
        };
        out.push_str(&format!(
            "{} {} {} {} {} {}\n",
            cell(&task.title, TITLE_WIDTH),
            status_cell(task.status),
            priority_cell(task.priority),
            due,
            cell(&task.assigned_to, ASSIGNEE_WIDTH),
            style(&task.id).dim(),
        ));
    }
    out
}

pub fn task_detail<Tz>(task: &Task, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut due = format_date(&task.due_date, tz);
    if task.is_overdue(now) {
        due.push_str(&format!(" {}", style("(overdue)").red()));
    }

    let rows = [
        ("ID", task.id.clone()),
        ("Title", task.title.clone()),
        ("Description", task.description.clone().unwrap_or_else(|| "-".to_string())),
        ("Status", task.status.label().to_string()),
        ("Priority", task.priority.label().to_string()),
        ("Start", format_date(&task.start_date, tz)),
        ("Due", due),
        ("Created By", task.created_by.clone()),
        ("Assigned To", task.assigned_to.clone()),
    ];

    rows.iter()
        .map(|(label, value)| format!("{} {}\n", style(pad_str(label, 12, Alignment::Left, None)).dim(), value))
        .collect()
}

pub fn user_line(user: &User) -> String {
    format!("{} <{}> ({})", style(&user.user_name).bold(), user.user_email, user.role)
}

pub fn user_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }
    users.iter().map(|user| format!("{}\n", user_line(user))).collect()
}

use clap::{Args, Parser, Subcommand};
use taskz_core::{Priority, StatusFilter, TaskForm, TaskStatus};

/// Manage Taskz tasks from the terminal
#[derive(Debug, Parser)]
#[command(name = "taskz")]
#[command(about = "Manage Taskz tasks from the terminal")]
#[command(version)]
pub struct Cli {
    /// Backend URL (overrides the configuration file and TASKZ_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        /// Account email
        email: String,

        /// Password (prompted when omitted)
        #[arg(long, env = "TASKZ_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Create a new account
    Signup {
        /// Account email
        email: String,

        /// Display name
        name: String,
    },

    /// Show the signed-in user
    Whoami,

    /// Greeting, task counters and the task table
    Dashboard(TaskQuery),

    /// List tasks
    Tasks(TaskQuery),

    /// Show a single task
    Show {
        /// Task id
        id: String,
    },

    /// Create a task
    Create(TaskFields),

    /// Update a task; only the given fields change
    Update {
        /// Task id
        id: String,

        #[command(flatten)]
        fields: TaskFields,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List all users
    Users,
}

impl Command {
    /// Whether the command needs a signed-in session.
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. } | Command::Logout | Command::Signup { .. }
        )
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct TaskQuery {
    /// Case-insensitive text matched against title, description and assignee
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// all, pending, in_progress or completed
    #[arg(long, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,
}

/// Task form fields as given on the command line.
#[derive(Debug, Clone, Default, Args)]
pub struct TaskFields {
    #[arg(long)]
    pub title: Option<String>,

    /// Description; an empty value clears it
    #[arg(long)]
    pub description: Option<String>,

    /// Local start time (YYYY-MM-DDTHH:MM)
    #[arg(long, value_name = "DATETIME")]
    pub start: Option<String>,

    /// Local due time (YYYY-MM-DDTHH:MM)
    #[arg(long, value_name = "DATETIME")]
    pub due: Option<String>,

    /// low, medium or high
    #[arg(long)]
    pub priority: Option<Priority>,

    /// pending, in_progress or completed
    #[arg(long)]
    pub status: Option<TaskStatus>,

    /// Assignee email
    #[arg(long, value_name = "EMAIL")]
    pub assign: Option<String>,
}

impl TaskFields {
    /// Overwrite the form fields that were given.
    pub fn apply_to(self, form: &mut TaskForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(start) = self.start {
            form.start_date = start;
        }
        if let Some(due) = self.due {
            form.due_date = due;
        }
        if let Some(priority) = self.priority {
            form.priority = priority;
        }
        if let Some(status) = self.status {
            form.status = status;
        }
        if let Some(assign) = self.assign {
            form.assigned_to = assign;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start.is_none()
            && self.due.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.assign.is_none()
    }
}

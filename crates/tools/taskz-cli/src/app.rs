//! Command execution against the Taskz backend.

use crate::cli::{Command, TaskFields, TaskQuery};
use crate::config::AppConfig;
use crate::navigation::{Navigator, Route};
use crate::render;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, Timelike, Utc};
use console::{Term, style};
use dialoguer::{Confirm, Password, theme::ColorfulTheme};
use std::sync::Arc;
use taskz_client::{ApiError, FileStorage, Session, TaskzClient};
use taskz_core::{
    NewUser, TaskForm, User, compute_stats_now, filter_tasks, validate_new_password,
};
use tracing::{debug, warn};

/// The screen a command starts on.
pub fn start_route(command: &Command) -> Route {
    match command {
        Command::Login { .. } => Route::SignIn,
        Command::Signup { .. } => Route::SignUp,
        Command::Logout => Route::Home,
        Command::Whoami => Route::Settings,
        _ => Route::Dashboard,
    }
}

const FALLBACK_DISPLAY_NAME: &str = "User";

fn failure(action: &str, err: ApiError) -> anyhow::Error {
    debug!("{} failed: {}", action, err);
    anyhow!("{}: {}", action, err.user_message())
}

pub struct App {
    client: TaskzClient,
    navigator: Arc<Navigator>,
    base_url: String,
    out: Term,
}

impl App {
    /// Build the app on the session persisted at the configured path.
    pub fn new(config: &AppConfig, start: Route) -> Result<Self> {
        let path = config.session_path()?;
        debug!("Using session file {}", path.display());
        let session = Session::hydrate(Arc::new(FileStorage::new(path)))
            .context("Failed to restore session")?;
        Self::with_session(config, Arc::new(session), start)
    }

    pub fn with_session(config: &AppConfig, session: Arc<Session>, start: Route) -> Result<Self> {
        let navigator = Arc::new(Navigator::new(start));
        let notices = Term::stderr();

        let client = TaskzClient::builder(config.client_config())
            .with_session(session)
            .on_session_event({
                let navigator = navigator.clone();
                move |event| {
                    if navigator.handle(event) {
                        let _ = notices.write_line(&format!(
                            "{}",
                            style("Your session has expired. Please sign in again.").yellow()
                        ));
                    }
                }
            })
            .build()
            .context("Failed to create Taskz client")?;

        Ok(Self {
            client,
            navigator,
            base_url: config.api.base_url.trim().to_string(),
            out: Term::stdout(),
        })
    }

    pub fn client(&self) -> &TaskzClient {
        &self.client
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    fn print(&self, text: &str) -> Result<()> {
        self.out.write_str(text)?;
        Ok(())
    }

    fn println(&self, line: &str) -> Result<()> {
        self.out.write_line(line)?;
        Ok(())
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        if command.requires_session() && !self.client.session().is_authenticated() {
            self.navigator.redirect_to_sign_in();
            bail!("Not signed in. Run `taskz login <email>` first.");
        }

        match command {
            Command::Login { email, password } => self.login(&email, password).await,
            Command::Logout => self.logout(),
            Command::Signup { email, name } => self.signup(&email, &name).await,
            Command::Whoami => self.whoami().await,
            Command::Dashboard(query) => self.dashboard(query).await,
            Command::Tasks(query) => self.tasks(query).await,
            Command::Show { id } => self.show(&id).await,
            Command::Create(fields) => self.create(fields).await,
            Command::Update { id, fields } => self.update(&id, fields).await,
            Command::Delete { id, yes } => self.delete(&id, yes).await,
            Command::Users => self.users().await,
        }
    }

    async fn login(&self, email: &str, password: Option<String>) -> Result<()> {
        let email = email.trim();
        if email.is_empty() {
            bail!("Email is required");
        }
        let password = match password {
            Some(password) => password,
            None => Password::with_theme(&ColorfulTheme::default())
                .with_prompt("Password")
                .interact()?,
        };
        if password.is_empty() {
            bail!("Password is required");
        }

        let signed_in = self
            .client
            .sign_in(email, &password)
            .await
            .map_err(|e| anyhow!(e.login_message(&self.base_url)))?;

        match signed_in.user {
            Some(user) => self.println(&format!("Signed in as {}", render::user_line(&user))),
            None => self.println(&format!("Signed in as {}", style(email).bold())),
        }
    }

    fn logout(&self) -> Result<()> {
        self.client.logout().context("Failed to clear session")?;
        self.println("Signed out.")
    }

    async fn signup(&self, email: &str, name: &str) -> Result<()> {
        let theme = ColorfulTheme::default();
        let password = Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()?;
        let confirm = Password::with_theme(&theme)
            .with_prompt("Confirm password")
            .interact()?;
        validate_new_password(&password, &confirm)?;

        let user = self
            .client
            .signup(&NewUser::new(email.trim(), name.trim(), password))
            .await
            .map_err(|e| failure("Sign up failed", e))?;

        self.navigator.navigate(Route::SignIn);
        self.println(&format!(
            "Account created for {}. Run `taskz login {}` to sign in.",
            style(&user.user_name).bold(),
            user.user_email
        ))
    }

    /// The signed-in user, from the session cache or the backend.
    async fn current_user(&self) -> Result<User> {
        if let Some(user) = self.client.session().user() {
            return Ok(user);
        }
        self.fetch_current_user().await
    }

    async fn fetch_current_user(&self) -> Result<User> {
        let user = self
            .client
            .get_current_user()
            .await
            .map_err(|e| failure("Failed to load profile", e))?;
        if let Err(e) = self.client.session().set_user(user.clone()) {
            warn!("Failed to cache user profile: {}", e);
        }
        Ok(user)
    }

    async fn whoami(&self) -> Result<()> {
        let user = self.fetch_current_user().await?;
        self.println(&render::user_line(&user))
    }

    /// Name for the dashboard greeting. A profile that cannot be loaded
    /// does not keep the user out of the dashboard; only a rejected session
    /// does.
    async fn display_name(&self) -> Result<String> {
        if let Some(user) = self.client.session().user() {
            return Ok(user.user_name);
        }
        match self.client.get_current_user().await {
            Ok(user) => {
                if let Err(e) = self.client.session().set_user(user.clone()) {
                    warn!("Failed to cache user profile: {}", e);
                }
                Ok(user.user_name)
            }
            Err(e) if e.is_unauthorized() => Err(failure("Failed to load profile", e)),
            Err(e) => {
                warn!("Failed to load profile for greeting: {}", e);
                Ok(FALLBACK_DISPLAY_NAME.to_string())
            }
        }
    }

    async fn dashboard(&self, query: TaskQuery) -> Result<()> {
        let name = self.display_name().await?;
        let tasks = self
            .client
            .list_tasks()
            .await
            .map_err(|e| failure("Failed to load tasks", e))?;

        let stats = compute_stats_now(&tasks);
        let visible = filter_tasks(&tasks, &query.search, query.status);

        self.println(&render::greeting_line(&name, Local::now().hour()))?;
        self.println("")?;
        self.print(&render::stats_cards(&stats))?;
        self.println("")?;
        self.print(&render::task_table(&visible, Utc::now(), &Local))
    }

    async fn tasks(&self, query: TaskQuery) -> Result<()> {
        let tasks = self
            .client
            .list_tasks()
            .await
            .map_err(|e| failure("Failed to load tasks", e))?;
        let visible = filter_tasks(&tasks, &query.search, query.status);

        self.print(&render::task_table(&visible, Utc::now(), &Local))?;
        if visible.len() != tasks.len() {
            self.println(&format!(
                "{}",
                style(format!("Showing {} of {} tasks", visible.len(), tasks.len())).dim()
            ))?;
        }
        Ok(())
    }

    async fn show(&self, id: &str) -> Result<()> {
        let task = self
            .client
            .get_task(id)
            .await
            .map_err(|e| failure("Failed to load task", e))?;
        self.print(&render::task_detail(&task, Utc::now(), &Local))
    }

    async fn create(&self, fields: TaskFields) -> Result<()> {
        let user = self.current_user().await?;

        let mut form = TaskForm::new_task(Utc::now(), &user.user_email, &Local);
        fields.apply_to(&mut form);
        let payload = form.into_new_task(&user.user_email, &Local)?;

        let created = self
            .client
            .create_task(&payload)
            .await
            .map_err(|e| failure("Failed to create task", e))?;
        self.println(&format!(
            "Created task {} ({})",
            style(&created.title).bold(),
            created.id
        ))
    }

    async fn update(&self, id: &str, fields: TaskFields) -> Result<()> {
        if fields.is_empty() {
            bail!("Nothing to update. Pass at least one field, e.g. --status completed");
        }

        let task = self
            .client
            .get_task(id)
            .await
            .map_err(|e| failure("Failed to load task", e))?;
        let user = self.current_user().await?;

        let mut form = TaskForm::for_task(&task, &user.user_email, &Local);
        fields.apply_to(&mut form);
        let patch = form.into_patch(&Local)?;

        let updated = self
            .client
            .update_task(id, &patch)
            .await
            .map_err(|e| failure("Failed to update task", e))?;
        self.println(&format!("Updated task {}", style(&updated.title).bold()))
    }

    async fn delete(&self, id: &str, yes: bool) -> Result<()> {
        if !yes {
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Are you sure you want to delete this task?")
                .default(false)
                .interact()?;
            if !confirmed {
                return self.println("Cancelled.");
            }
        }

        self.client
            .delete_task(id)
            .await
            .map_err(|e| failure("Failed to delete task", e))?;
        self.println(&format!("Deleted task {id}"))
    }

    async fn users(&self) -> Result<()> {
        let users = self
            .client
            .list_users()
            .await
            .map_err(|e| failure("Failed to load users", e))?;
        self.print(&render::user_table(&users))
    }
}

//! HTTP client for the Taskz backend.
//!
//! Requests made through [`TaskzClient`] carry the session's bearer token. A
//! 401 answer to any of them clears the session and notifies the handlers
//! registered with [`TaskzClientBuilder::on_session_event`]; deciding what to
//! show next (normally the sign-in screen) is left to the host.

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::{Session, SessionEvent};
use crate::types::{LoginResponse, RawLoginResponse, SignIn, extract_error_message};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use taskz_core::{NewTask, NewUser, Task, TaskPatch, User};
use tracing::{debug, error, info, warn};
use url::Url;

type SessionHandler = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// Builder for [`TaskzClient`]
pub struct TaskzClientBuilder {
    config: ClientConfig,
    session: Option<Arc<Session>>,
    handlers: Vec<SessionHandler>,
}

impl TaskzClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            session: None,
            handlers: Vec::new(),
        }
    }

    /// Use an existing session instead of a fresh in-memory one
    pub fn with_session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Register a handler for session changes (sign-in, sign-out, expiry)
    pub fn on_session_event<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or the
    /// underlying HTTP client fails to build
    pub fn build(self) -> ApiResult<TaskzClient> {
        let base_url = Url::parse(self.config.base_url.trim())
            .map_err(|e| ApiError::invalid_url(format!("{}: {}", self.config.base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ApiError::invalid_url(format!(
                "{}: expected an http(s) URL",
                self.config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(self.config.request_timeout)
            .build()
            .map_err(|e| ApiError::configuration(format!("Failed to create HTTP client: {e}")))?;

        debug!("Created Taskz client for {}", base_url);

        Ok(TaskzClient {
            http,
            base_url,
            session: self
                .session
                .unwrap_or_else(|| Arc::new(Session::in_memory())),
            login_timeout: self.config.login_timeout,
            handlers: self.handlers.into(),
        })
    }
}

/// Typed client for the Taskz REST API
#[derive(Clone)]
pub struct TaskzClient {
    http: Client,
    base_url: Url,
    session: Arc<Session>,
    login_timeout: Duration,
    handlers: Arc<[SessionHandler]>,
}

impl std::fmt::Debug for TaskzClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskzClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .field("login_timeout", &self.login_timeout)
            .finish()
    }
}

impl TaskzClient {
    pub fn builder(config: ClientConfig) -> TaskzClientBuilder {
        TaskzClientBuilder::new(config)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Join path segments onto the base URL, percent-encoding each segment.
    /// An empty trailing segment produces a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::invalid_url(self.base_url.as_str()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn emit(&self, event: SessionEvent) {
        for handler in self.handlers.iter() {
            handler(&event);
        }
    }

    /// Drop the rejected session and tell the host about it.
    fn expire_session(&self) {
        warn!("Backend rejected the session token, clearing session");
        if let Err(e) = self.session.clear() {
            error!("Failed to clear persisted session: {}", e);
        }
        self.emit(SessionEvent::Expired);
    }

    /// Send an authenticated request.
    ///
    /// Attaches the bearer token when one is present and turns every non-2xx
    /// response into an [`ApiError`]. A 401 additionally expires the session.
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(ApiError::Unreachable)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = read_error_message(response).await;
        debug!("Request failed with {}: {:?}", status, message);
        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
        }
        Err(ApiError::from_status(status, message))
    }

    async fn request_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        decode_json(response).await
    }

    fn request(&self, method: Method, segments: &[&str]) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url);
        Ok(self.http.request(method, url))
    }

    /// Exchange credentials for an access token and store it in the session.
    ///
    /// Bad credentials are reported as [`ApiError::Unauthorized`] without
    /// touching the current session or emitting [`SessionEvent::Expired`].
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let url = self.endpoint(&["auth", "login"])?;
        info!("Logging in as {}", email);

        let response = self
            .http
            .post(url)
            .form(&[("username", email), ("password", password)])
            .timeout(self.login_timeout)
            .send()
            .await
            .map_err(ApiError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            let message = read_error_message(response).await;
            warn!("Login for {} failed with {}", email, status);
            return Err(ApiError::from_status(status, message));
        }

        let raw: RawLoginResponse = decode_json(response).await?;
        let access_token = raw
            .access_token
            .filter(|token| !token.trim().is_empty())
            .ok_or(ApiError::MissingToken)?;
        let token_type = raw.token_type.unwrap_or_else(|| "bearer".to_string());

        self.session.set(access_token.clone(), None)?;
        info!("Logged in as {}", email);

        Ok(LoginResponse {
            access_token,
            token_type,
        })
    }

    /// Log in, then cache the user's profile.
    ///
    /// The profile fetch is best effort: when it fails the sign-in still
    /// succeeds with `user: None`, unless the backend rejects the new token.
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<SignIn> {
        let login = self.login(email, password).await?;

        let user = match self.get_current_user().await {
            Ok(user) => {
                if let Err(e) = self.session.set_user(user.clone()) {
                    warn!("Failed to cache user profile: {}", e);
                }
                Some(user)
            }
            // The token was rejected right after being issued; the session is
            // already cleared, so there is nothing to enter.
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => {
                warn!("Failed to get user info after login: {}", e);
                None
            }
        };

        self.emit(SessionEvent::SignedIn {
            user_email: user.as_ref().map(|user| user.user_email.clone()),
        });

        Ok(SignIn {
            token: login.access_token,
            user,
        })
    }

    /// Forget the local session. The backend keeps no server-side state.
    pub fn logout(&self) -> ApiResult<()> {
        self.session.clear()?;
        info!("Logged out");
        self.emit(SessionEvent::SignedOut);
        Ok(())
    }

    /// `POST /users/`
    pub async fn signup(&self, user: &NewUser) -> ApiResult<User> {
        info!("Registering user {}", user.user_email);
        let request = self.request(Method::POST, &["users", ""])?.json(user);
        self.request_json(request).await
    }

    /// `GET /auth/me`
    pub async fn get_current_user(&self) -> ApiResult<User> {
        let request = self.request(Method::GET, &["auth", "me"])?;
        self.request_json(request).await
    }

    /// `GET /users/`
    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        let request = self.request(Method::GET, &["users", ""])?;
        self.request_json(request).await
    }

    /// `GET /tasks/`
    pub async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        let request = self.request(Method::GET, &["tasks", ""])?;
        let tasks: Vec<Task> = self.request_json(request).await?;
        debug!("Loaded {} tasks", tasks.len());
        Ok(tasks)
    }

    /// `GET /tasks/{id}`
    pub async fn get_task(&self, id: &str) -> ApiResult<Task> {
        let request = self.request(Method::GET, &["tasks", id])?;
        self.request_json(request).await
    }

    /// `POST /tasks/`
    pub async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        let request = self.request(Method::POST, &["tasks", ""])?.json(task);
        let created: Task = self.request_json(request).await?;
        info!("Created task {}", created.id);
        Ok(created)
    }

    /// `PUT /tasks/{id}` with only the fields present in `patch`
    pub async fn update_task(&self, id: &str, patch: &TaskPatch) -> ApiResult<Task> {
        let request = self.request(Method::PUT, &["tasks", id])?.json(patch);
        let updated: Task = self.request_json(request).await?;
        info!("Updated task {}", id);
        Ok(updated)
    }

    /// `DELETE /tasks/{id}`
    pub async fn delete_task(&self, id: &str) -> ApiResult<()> {
        let request = self.request(Method::DELETE, &["tasks", id])?;
        self.send(request).await?;
        info!("Deleted task {}", id);
        Ok(())
    }
}

async fn read_error_message(response: Response) -> Option<String> {
    match response.bytes().await {
        Ok(body) => extract_error_message(&body),
        Err(e) => {
            debug!("Failed to read error body: {}", e);
            None
        }
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::invalid_response(format!("failed to read body: {e}")))?;
    serde_json::from_slice(&body).map_err(|e| ApiError::invalid_response(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> TaskzClient {
        TaskzClientBuilder::new(ClientConfig::new(base_url))
            .build()
            .unwrap()
    }

    #[test]
    fn test_endpoint_joining() {
        let client = client("http://localhost:8000");
        assert_eq!(
            client.endpoint(&["tasks", ""]).unwrap().as_str(),
            "http://localhost:8000/tasks/"
        );
        assert_eq!(
            client.endpoint(&["tasks", "a b/c"]).unwrap().as_str(),
            "http://localhost:8000/tasks/a%20b%2Fc"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("https://example.com/api/");
        assert_eq!(
            client.endpoint(&["auth", "login"]).unwrap().as_str(),
            "https://example.com/api/auth/login"
        );

        let client = self::client("https://example.com/api");
        assert_eq!(
            client.endpoint(&["auth", "me"]).unwrap().as_str(),
            "https://example.com/api/auth/me"
        );
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let result = TaskzClientBuilder::new(ClientConfig::new("mailto:someone@example.com")).build();
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));

        let result = TaskzClientBuilder::new(ClientConfig::new("not a url")).build();
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_logout_clears_session_and_notifies() {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorded = events.clone();
        let client = TaskzClientBuilder::new(ClientConfig::default())
            .on_session_event(move |event| recorded.lock().unwrap().push(event.clone()))
            .build()
            .unwrap();

        client.session().set_token("tok").unwrap();
        client.logout().unwrap();

        assert!(!client.session().is_authenticated());
        assert_eq!(*events.lock().unwrap(), vec![SessionEvent::SignedOut]);
    }
}

//! Error types for the Taskz REST client.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;
pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of a call to the Taskz backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("Backend unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// 401 from the backend: bad credentials at login, or an expired token.
    #[error("Unauthorized{}", format_message(.message))]
    Unauthorized { message: Option<String> },

    /// Any other non-2xx response.
    #[error("HTTP error {status}{}", format_message(.message))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    /// The login succeeded but the body carried no access token.
    #[error("Invalid response from server: missing access token")]
    MissingToken,

    /// A 2xx body that could not be decoded into the expected type.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

fn format_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

impl ApiError {
    pub fn invalid_response<S: Into<String>>(msg: S) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn invalid_url<S: Into<String>>(url: S) -> Self {
        Self::InvalidUrl(url.into())
    }

    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build the error for a non-2xx status.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized { message }
        } else {
            Self::Server { status, message }
        }
    }

    /// HTTP status returned by the backend, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message supplied by the backend, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Unreachable(source) if source.is_timeout())
    }

    /// Text shown to the user when signing in fails.
    pub fn login_message(&self, base_url: &str) -> String {
        match self {
            Self::Unreachable(_) => format!(
                "Network error. Please make sure the backend server is reachable at {base_url}"
            ),
            Self::Unauthorized { .. } => "Invalid email or password".to_string(),
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::MissingToken => "Invalid response from server".to_string(),
            _ => "Login failed. Please try again.".to_string(),
        }
    }

    /// Text shown to the user when any other request fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unreachable(_) => {
                "Could not reach the backend. Check that it is running and reachable.".to_string()
            }
            Self::Unauthorized { .. } => "Your session has expired. Please sign in again.".to_string(),
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Server { status, .. } => format!("Request failed ({status}). Please try again."),
            other => other.to_string(),
        }
    }
}

/// Failure of the persistence area backing a session.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read or write session data: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, None);
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.to_string(), "Unauthorized");

        let err = ApiError::from_status(StatusCode::NOT_FOUND, Some("Task not found".to_string()));
        assert!(!err.is_unauthorized());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.message(), Some("Task not found"));
        assert_eq!(err.to_string(), "HTTP error 404 Not Found: Task not found");
    }

    #[test]
    fn test_login_messages() {
        let base = "http://localhost:8000";
        assert_eq!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, Some("Invalid email or password".into()))
                .login_message(base),
            "Invalid email or password"
        );
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_REQUEST, Some("Inactive user".into()))
                .login_message(base),
            "Inactive user"
        );
        assert_eq!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, None).login_message(base),
            "Login failed. Please try again."
        );
        assert_eq!(ApiError::MissingToken.status(), None);
        assert_eq!(
            ApiError::MissingToken.login_message(base),
            "Invalid response from server"
        );
    }

    #[test]
    fn test_user_message_falls_back_without_server_text() {
        let err = ApiError::from_status(StatusCode::FORBIDDEN, None);
        assert_eq!(err.user_message(), "Request failed (403 Forbidden). Please try again.");

        let err = ApiError::from_status(StatusCode::FORBIDDEN, Some("Not authorized to update this task".into()));
        assert_eq!(err.user_message(), "Not authorized to update this task");
    }

    #[test]
    fn test_storage_json_message() {
        let source = serde_json::from_str::<serde_json::Value>("{truncated").unwrap_err();
        let err = StorageError::from(source);
        assert!(err.to_string().starts_with("Failed to read or write session data: "));
    }
}

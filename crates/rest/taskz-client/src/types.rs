//! Request and response bodies specific to the client.

use serde::{Deserialize, Serialize};
use taskz_core::User;

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Login body as received, before the token has been checked.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawLoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Result of the sign-in workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub token: String,
    /// The profile, when fetching it after login succeeded.
    pub user: Option<User>,
}

/// Error bodies as produced by the backend: `{"detail": "..."}`, a list of
/// validation errors under `detail`, or a plain `{"message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Pull a human-readable message out of an error response body.
pub(crate) fn extract_error_message(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let Ok(parsed) = serde_json::from_str::<ErrorBody>(text) else {
        return if text.starts_with('{') || text.starts_with('[') {
            None
        } else {
            Some(text.to_string())
        };
    };

    let message = match parsed.detail {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => Some(detail),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                .collect();
            if messages.is_empty() {
                parsed.message
            } else {
                Some(messages.join("; "))
            }
        }
        _ => parsed.message,
    };
    message.filter(|message| !message.is_empty())
}

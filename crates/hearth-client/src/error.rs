//! Client error types.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (connection refused, timeout, TLS, ...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend rejected a username/password pair.
    #[error("Login failed: {0}")]
    InvalidCredentials(String),

    /// The backend rejected submitted fields.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The refresh endpoint refused to mint a new access token.
    #[error("Token refresh rejected ({status}): {message}")]
    RefreshRejected {
        /// HTTP status of the refresh response. A 2xx status means the body
        /// was malformed or carried no access token.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The session could not be recovered; stored tokens have been purged.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// The account was created but the follow-up login failed.
    #[error("Account '{username}' was created, but logging in failed: {source}")]
    RegistrationSucceededLoginFailed {
        /// Name of the account that now exists on the backend.
        username: String,
        /// Why the login attempt failed.
        source: Box<Error>,
    },

    /// Server returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
        /// Raw response body, when it was JSON.
        body: Option<Value>,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session storage failed.
    #[error("Token store error: {0}")]
    Store(String),
}

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_)) || matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidCredentials(_)
                | Error::RefreshRejected { .. }
                | Error::SessionExpired
                | Error::Api { status: 401, .. }
        )
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// Check if the user must log in again before retrying.
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::SessionExpired)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Field-level messages returned by the backend on a rejected submission.
///
/// Keys are field names (`non_field_errors` for form-wide messages); values
/// are kept in the order the backend sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Collect field errors from a JSON error body.
    ///
    /// Accepts `{"field": ["msg", ...]}`, `{"field": "msg"}` and
    /// `{"detail": "msg"}` shapes. Anything else yields an empty set.
    pub fn from_body(body: &Value) -> Self {
        let mut fields = BTreeMap::new();
        if let Value::Object(map) = body {
            for (field, value) in map {
                let messages = messages_of(value);
                if !messages.is_empty() {
                    fields.insert(field.clone(), messages);
                }
            }
        }
        Self { fields }
    }

    /// Build from explicit field/message pairs.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), vec![message.into()]);
        Self { fields }
    }

    /// Messages for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Iterate over `(field, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First message across all fields.
    pub fn first_message(&self) -> Option<&str> {
        self.fields
            .values()
            .flat_map(|messages| messages.first())
            .map(String::as_str)
            .next()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return f.write_str("request rejected");
        }
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            if field == "non_field_errors" || field == "detail" {
                write!(f, "{}", messages.join(" "))?;
            } else {
                write!(f, "{}: {}", field, messages.join(" "))?;
            }
        }
        Ok(())
    }
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Pull a user-facing message out of an error body.
///
/// Prefers `detail`, then the first field error.
pub(crate) fn extract_message(body: &Value) -> Option<String> {
    if let Some(detail) = body.get("detail").and_then(Value::as_str) {
        return Some(detail.to_string());
    }
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return Some(error.to_string());
    }
    FieldErrors::from_body(body).first_message().map(str::to_string)
}

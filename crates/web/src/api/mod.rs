//! Laundry backend API client.
//!
//! # Architecture
//!
//! - One `reqwest` client per process, rooted at the configured base URL
//! - The backend is the source of truth - no local caching, direct API calls
//! - Every call resolves once: no retries, no backoff
//!
//! Each call returns a discriminated result: the parsed body on a success
//! status, [`ApiError::Status`] with the parsed error body on a non-success
//! status, [`ApiError::Transport`] when the request never completed, and
//! [`ApiError::Decode`] when a success response could not be parsed.
//!
//! # Example
//!
//! ```rust,ignore
//! use laundry_web::api::LaundryClient;
//!
//! let client = LaundryClient::new(&config.api)?;
//! let estimate = client.estimate_price("Shirt", 3).await?;
//! println!("{}", estimate.estimated_price);
//! ```

mod client;
pub mod types;

pub use client::LaundryClient;
pub use types::*;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the laundry backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (DNS, refused connection, timeout).
    #[error("could not reach the laundry backend: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("laundry backend returned {status}: {}", .body.summary())]
    Status { status: StatusCode, body: ErrorBody },

    /// The backend answered with a success status but an unreadable body.
    #[error("unexpected response from the laundry backend: {0}")]
    Decode(String),

    /// The outgoing request could not be assembled.
    #[error("could not build request: {0}")]
    Build(#[source] reqwest::Error),

    /// The configured base URL cannot have paths appended to it.
    #[error("backend URL cannot be used as a base: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// HTTP status of a server error, if the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's `detail` text, when the error body carried one.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Status { body, .. } => body.detail(),
            _ => None,
        }
    }

    /// Message to show a user: the backend detail, else `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or_else(|| fallback.to_string())
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Body of a non-success response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// Body parsed as JSON.
    Json(serde_json::Value),
    /// Body was not JSON.
    Text(String),
    /// No body.
    Empty,
}

/// Longest raw body echoed into log messages.
const SUMMARY_LIMIT: usize = 200;

impl ErrorBody {
    /// Classify a raw response body.
    #[must_use]
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            return Self::Empty;
        }
        serde_json::from_str(&text).map_or(Self::Text(text), Self::Json)
    }

    /// Extract the `detail` field.
    ///
    /// The backend sends `{"detail": "..."}` for its own errors and
    /// `{"detail": [{"msg": "..."}, ...]}` for request validation failures.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        let Self::Json(value) = self else {
            return None;
        };
        match value.get("detail")? {
            serde_json::Value::String(message) if !message.trim().is_empty() => {
                Some(message.clone())
            }
            serde_json::Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }

    /// Short description for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        if let Some(detail) = self.detail() {
            return detail;
        }
        match self {
            Self::Json(value) => truncate(&value.to_string()),
            Self::Text(text) => truncate(text.trim()),
            Self::Empty => "(empty body)".to_string(),
        }
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= SUMMARY_LIMIT {
        return s.to_string();
    }
    let cut: String = s.chars().take(SUMMARY_LIMIT).collect();
    format!("{cut}…")
}

//! Access to the remote user store.
//!
//! Page controllers only see the [`UserStore`] port; the HTTP adapter lives in
//! [`http`].

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::model::{User, UserId};

pub mod http;
#[cfg(test)]
pub mod fake;

pub use http::HttpUserStore;

/// Failures talking to the store, normalized for display by
/// [`StoreError::display_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The request never produced a response.
    #[error("Network Error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    /// Non-2xx answer, with the body's `message` field when it has one.
    #[error("Request failed with status code {status}")]
    Status { status: u16, message: Option<String> },
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn status(status: u16) -> Self {
        Self::Status {
            status,
            message: None,
        }
    }

    /// The text a page shows: the store's own message if it sent one,
    /// otherwise the generic description.
    pub fn display_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extracts a non-empty `message` string from an error body, if the body is a
/// JSON object carrying one.
pub fn error_message_from_body(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = value.as_object()?.get("message")?.as_str()?.trim();
    (!message.is_empty()).then(|| message.to_owned())
}

/// CRUD operations offered by the remote store. Records are whole JSON
/// documents: `create` and `update` send exactly what they are given.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn get(&self, id: &UserId) -> Result<Value, StoreError>;

    async fn create(&self, draft: &Value) -> Result<Value, StoreError>;

    async fn update(&self, id: &UserId, record: &Value) -> Result<Value, StoreError>;

    async fn delete(&self, id: &UserId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_message_wins() {
        let err = StoreError::Status {
            status: 400,
            message: Some("email is already taken".to_string()),
        };
        assert_eq!(err.display_message(), "email is already taken");
    }

    #[test]
    fn generic_text_without_message() {
        assert_eq!(
            StoreError::status(404).display_message(),
            "Request failed with status code 404"
        );
        assert_eq!(StoreError::Timeout.display_message(), "Request timed out");
    }

    #[test]
    fn extracts_error_message_from_body() {
        assert_eq!(
            error_message_from_body(br#"{"message":"Invalid email"}"#),
            Some("Invalid email".to_string())
        );
        assert_eq!(error_message_from_body(br#""Not found""#), None);
        assert_eq!(error_message_from_body(br#"{"message":"  "}"#), None);
        assert_eq!(error_message_from_body(br#"{"message":3}"#), None);
        assert_eq!(error_message_from_body(b"<html>bad gateway</html>"), None);
    }
}

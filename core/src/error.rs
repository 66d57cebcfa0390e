//! Error types for the Nova Poshta API client.
//!
//! # Design
//! The provider reports failures inside a `{success, errors}` envelope, so the
//! caller-facing contract is an ordered list of error strings. `ApiError`
//! keeps the failure category as the variant and exposes that list through
//! [`ApiError::errors`]. Every failure is a returned value; nothing in this
//! crate panics or aborts on a bad response.

use thiserror::Error;

/// Message used whenever the provider gives no error text of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred.";

/// Result alias used by every client operation.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by `NovaPoshtaClient` operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The HTTP exchange itself failed, or a non-2xx response carried no
    /// parseable envelope.
    #[error("API request failed: {0}")]
    Transport(String),

    /// The provider answered `success: false`.
    #[error("{}", .0.join("; "))]
    Rejected(Vec<String>),

    /// The provider answered `success: true` with an empty or missing `data`.
    #[error("{}", .0.join("; "))]
    EmptyResult(Vec<String>),

    /// The body was not JSON or did not carry a `success` flag.
    #[error("Unknown error occurred.")]
    Malformed,

    /// A result row did not match the schema expected by the operation.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Build a `Rejected` error from the envelope's optional `errors` list.
    ///
    /// A present list is kept as sent, even when empty; only a missing one
    /// becomes [`UNKNOWN_ERROR`].
    pub(crate) fn rejected(errors: Option<Vec<String>>) -> Self {
        ApiError::Rejected(errors.unwrap_or_else(|| vec![UNKNOWN_ERROR.to_string()]))
    }

    /// The provider pairs empty `data` with `errors: []`, so an empty list here
    /// falls back to [`UNKNOWN_ERROR`] as well.
    pub(crate) fn empty_result(errors: Option<Vec<String>>) -> Self {
        ApiError::EmptyResult(or_unknown(errors))
    }

    /// The ordered error messages for this failure.
    ///
    /// Provider rejections yield the provider's own messages; every other
    /// category yields a single message describing it.
    pub fn errors(&self) -> Vec<String> {
        match self {
            ApiError::Rejected(errors) | ApiError::EmptyResult(errors) => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

fn or_unknown(errors: Option<Vec<String>>) -> Vec<String> {
    match errors {
        Some(errors) if !errors.is_empty() => errors,
        _ => vec![UNKNOWN_ERROR.to_string()],
    }
}

/// Failure reported by an [`HttpTransport`](crate::http::HttpTransport)
/// implementation. Only the message survives; it ends up inside
/// [`ApiError::Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self(cause.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_with_empty_list_stays_empty() {
        let err = ApiError::rejected(Some(Vec::new()));
        assert_eq!(err, ApiError::Rejected(Vec::new()));
        assert!(err.errors().is_empty());
    }

    #[test]
    fn transport_error_is_prefixed() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.errors(), vec!["API request failed: connection refused"]);
    }

    #[test]
    fn rejected_keeps_provider_messages_in_order() {
        let err = ApiError::rejected(Some(vec!["first".into(), "second".into()]));
        assert_eq!(err.errors(), vec!["first", "second"]);
        assert_eq!(err.to_string(), "first; second");
    }

    #[test]
    fn missing_or_empty_errors_fall_back_to_unknown() {
        assert_eq!(ApiError::rejected(None).errors(), vec![UNKNOWN_ERROR]);
        assert_eq!(ApiError::empty_result(None).errors(), vec![UNKNOWN_ERROR]);
        assert_eq!(ApiError::empty_result(Some(Vec::new())).errors(), vec![UNKNOWN_ERROR]);
        assert_eq!(ApiError::Malformed.errors(), vec![UNKNOWN_ERROR]);
    }
}

//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use cprovider::{ProviderError, ProviderErrorKind, classify_status};
//!
//! let auth = ProviderError::auth_or_config("bad key");
//! assert!(!auth.retryable);
//!
//! let overloaded = classify_status(503, "busy");
//! assert_eq!(overloaded.kind, ProviderErrorKind::TransientBackendOverload);
//! assert!(overloaded.retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    TransientBackendOverload,
    AuthOrConfig,
    InvalidRequest,
    UnexpectedBackend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub fn overloaded(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::TransientBackendOverload, message, true)
    }

    pub fn auth_or_config(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::AuthOrConfig, message, false)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    /// Connection resets, timeouts and unclassified 5xx answers.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::UnexpectedBackend, message, true)
    }

    /// A backend answer that cannot be turned into a reply. Repeating the call will not help.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::UnexpectedBackend, message, false)
    }

    pub fn is_overload(&self) -> bool {
        self.kind == ProviderErrorKind::TransientBackendOverload
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

/// Maps a non-success HTTP status to the shared failure taxonomy.
pub fn classify_status(status: u16, message: impl Into<String>) -> ProviderError {
    match status {
        429 | 503 | 529 => ProviderError::overloaded(message),
        401 | 403 | 404 => ProviderError::auth_or_config(message),
        400 | 422 => ProviderError::invalid_request(message),
        408 | 500..=599 => ProviderError::transport(message),
        _ => ProviderError::malformed_response(message),
    }
}

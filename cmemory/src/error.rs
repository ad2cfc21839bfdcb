//! Session-store errors for history persistence operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStoreErrorKind {
    /// The medium could not be read or written.
    Storage,
    /// A record exists but cannot be encoded or decoded.
    Serialization,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStoreError {
    pub kind: SessionStoreErrorKind,
    pub message: String,
}

impl SessionStoreError {
    pub fn new(kind: SessionStoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(SessionStoreErrorKind::Storage, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(SessionStoreErrorKind::Serialization, message)
    }
}

impl Display for SessionStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for SessionStoreError {}

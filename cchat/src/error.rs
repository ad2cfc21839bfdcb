//! Orchestrator construction errors.
//!
//! Exchanges never fail with these; they degrade to persona apologies instead.

use std::error::Error;
use std::fmt::{Display, Formatter};

use cmemory::SessionStoreError;
use cprompt::TemplateError;
use cprovider::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    Template,
    Store,
    Provider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Template, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<TemplateError> for ChatError {
    fn from(value: TemplateError) -> Self {
        ChatError::template(value.to_string())
    }
}

impl From<SessionStoreError> for ChatError {
    fn from(value: SessionStoreError) -> Self {
        ChatError::store(value.to_string())
    }
}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        ChatError::provider(value.to_string())
    }
}

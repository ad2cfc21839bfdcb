//! Startup errors for the facade and binary.

use std::error::Error;
use std::fmt::{Display, Formatter};

use cchat::ChatError;
use cmemory::SessionStoreError;
use cprompt::{TemplateError, TemplateErrorKind};
use cprovider::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConciergeErrorKind {
    Configuration,
    Provider,
    Template,
    Store,
    Chat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConciergeError {
    pub kind: ConciergeErrorKind,
    pub message: String,
}

impl ConciergeError {
    pub fn new(kind: ConciergeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ConciergeErrorKind::Configuration, message)
    }
}

impl Display for ConciergeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConciergeError {}

impl From<ProviderError> for ConciergeError {
    fn from(value: ProviderError) -> Self {
        Self::new(ConciergeErrorKind::Provider, value.to_string())
    }
}

impl From<TemplateError> for ConciergeError {
    fn from(value: TemplateError) -> Self {
        let kind = match value.kind {
            TemplateErrorKind::Configuration => ConciergeErrorKind::Configuration,
            _ => ConciergeErrorKind::Template,
        };
        Self::new(kind, value.to_string())
    }
}

impl From<SessionStoreError> for ConciergeError {
    fn from(value: SessionStoreError) -> Self {
        Self::new(ConciergeErrorKind::Store, value.to_string())
    }
}

impl From<ChatError> for ConciergeError {
    fn from(value: ChatError) -> Self {
        Self::new(ConciergeErrorKind::Chat, value.to_string())
    }
}

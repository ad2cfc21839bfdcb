//! Template-layer errors for lookup, rendering and example loading.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateErrorKind {
    /// The template root is missing or unusable. Fatal at startup.
    Configuration,
    NotFound,
    MissingVariable,
    Io,
    InvalidExamples,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateError {
    pub kind: TemplateErrorKind,
    pub message: String,
}

impl TemplateError {
    pub fn new(kind: TemplateErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(TemplateErrorKind::Configuration, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(TemplateErrorKind::NotFound, message)
    }

    pub fn missing_variable(message: impl Into<String>) -> Self {
        Self::new(TemplateErrorKind::MissingVariable, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(TemplateErrorKind::Io, message)
    }

    pub fn invalid_examples(message: impl Into<String>) -> Self {
        Self::new(TemplateErrorKind::InvalidExamples, message)
    }
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for TemplateError {}

//! Gemini adapter types and conversion from shared turns.

use crate::{Role, Turn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiRequest {
    pub model: String,
    pub system_instruction: String,
    pub contents: Vec<GeminiContent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiContent {
    pub role: GeminiRole,
    pub text: String,
}

impl From<&Turn> for GeminiContent {
    fn from(value: &Turn) -> Self {
        Self {
            role: value.role.into(),
            text: value.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiRole {
    User,
    Model,
}

impl GeminiRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

// Gemini contents only know `user` and `model`; stray system turns are sent as user text.
impl From<Role> for GeminiRole {
    fn from(value: Role) -> Self {
        match value {
            Role::Model => Self::Model,
            Role::User | Role::System => Self::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiResponse {
    pub text: String,
    pub finish_reason: Option<String>,
}

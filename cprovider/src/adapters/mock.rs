//! Deterministic offline provider.

use crate::{
    ModelProvider, ProviderError, ProviderFuture, ProviderIdentity, ProviderKind, Turn,
};
use crate::provider::ensure_system_instruction;

pub const MOCK_MODEL_NAME: &str = "mock-model";
pub const MOCK_REPLY: &str = "Boss, this is a simulated response. The interface works perfectly!";

/// Answers every request with the same canned text and performs no I/O.
#[derive(Debug, Clone)]
pub struct MockProvider {
    model_name: String,
    reply: String,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            model_name: MOCK_MODEL_NAME.to_string(),
            reply: MOCK_REPLY.to_string(),
        }
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = reply.into();
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }
}

impl ModelProvider for MockProvider {
    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::new(ProviderKind::Mock, self.model_name.clone())
    }

    fn generate<'a>(
        &'a self,
        system_instruction: &'a str,
        _turns: &'a [Turn],
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            ensure_system_instruction(system_instruction)?;
            Ok(self.reply.clone())
        })
    }
}

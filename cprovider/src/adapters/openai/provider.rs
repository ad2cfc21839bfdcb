//! OpenAI provider implementation over transport and shared models.

use std::sync::Arc;

use crate::provider::ensure_system_instruction;
use crate::{
    ModelProvider, NoopOperationHooks, ProviderError, ProviderFuture, ProviderIdentity,
    ProviderKind, ProviderOperationHooks, RetryPolicy, SecretString, Turn, execute_with_retry,
};

use super::transport::OpenAiTransport;
use super::types::{OpenAiMessage, OpenAiRequest};

pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Clone)]
pub struct OpenAiProvider {
    api_key: SecretString,
    transport: Arc<dyn OpenAiTransport>,
    model: String,
    retry_policy: RetryPolicy,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl OpenAiProvider {
    pub fn new(api_key: SecretString, transport: Arc<dyn OpenAiTransport>) -> Self {
        Self {
            api_key,
            transport,
            model: OPENAI_DEFAULT_MODEL.to_string(),
            retry_policy: RetryPolicy::default(),
            hooks: Arc::new(NoopOperationHooks),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = model;
        }
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// The system instruction becomes the leading `system` message on every call.
    pub(crate) fn build_openai_request(
        &self,
        system_instruction: &str,
        turns: &[Turn],
    ) -> OpenAiRequest {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(OpenAiMessage::system(system_instruction));
        messages.extend(turns.iter().map(OpenAiMessage::from));

        OpenAiRequest {
            model: self.model.clone(),
            messages,
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("model", &self.model)
            .field("transport", &self.transport)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl ModelProvider for OpenAiProvider {
    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::new(ProviderKind::Secondary, self.model.clone())
    }

    fn generate<'a>(
        &'a self,
        system_instruction: &'a str,
        turns: &'a [Turn],
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            ensure_system_instruction(system_instruction)?;
            let request = self.build_openai_request(system_instruction, turns);

            let response = execute_with_retry(
                ProviderKind::Secondary,
                "generate",
                &self.retry_policy,
                self.hooks.as_ref(),
                |_attempt| self.transport.complete(request.clone(), self.api_key.clone()),
                tokio::time::sleep,
            )
            .await?;

            Ok(response.content)
        })
    }
}

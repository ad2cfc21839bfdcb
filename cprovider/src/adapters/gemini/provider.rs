//! Gemini provider implementation over transport and shared models.

use std::sync::Arc;

use crate::provider::ensure_system_instruction;
use crate::{
    ModelProvider, NoopOperationHooks, ProviderError, ProviderFuture, ProviderIdentity,
    ProviderKind, ProviderOperationHooks, RetryPolicy, SecretString, Turn, execute_with_retry,
};

use super::transport::GeminiTransport;
use super::types::{GeminiContent, GeminiRequest};

pub const GEMINI_DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: SecretString,
    transport: Arc<dyn GeminiTransport>,
    model: String,
    retry_policy: RetryPolicy,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString, transport: Arc<dyn GeminiTransport>) -> Self {
        Self {
            api_key,
            transport,
            model: GEMINI_DEFAULT_MODEL.to_string(),
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

    pub(crate) fn build_gemini_request(
        &self,
        system_instruction: &str,
        turns: &[Turn],
    ) -> GeminiRequest {
        GeminiRequest {
            model: self.model.clone(),
            system_instruction: system_instruction.to_string(),
            contents: turns.iter().map(GeminiContent::from).collect(),
        }
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.model)
            .field("transport", &self.transport)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl ModelProvider for GeminiProvider {
    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::new(ProviderKind::Primary, self.model.clone())
    }

    fn generate<'a>(
        &'a self,
        system_instruction: &'a str,
        turns: &'a [Turn],
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            ensure_system_instruction(system_instruction)?;
            let request = self.build_gemini_request(system_instruction, turns);

            let response = execute_with_retry(
                ProviderKind::Primary,
                "generate",
                &self.retry_policy,
                self.hooks.as_ref(),
                |_attempt| {
                    self.transport
                        .generate_content(request.clone(), self.api_key.clone())
                },
                tokio::time::sleep,
            )
            .await?;

            Ok(response.text)
        })
    }
}

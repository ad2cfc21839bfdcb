//! Stable provider construction surface for facade consumers.

use std::sync::Arc;
use std::time::Duration;

use cprovider::adapters::DEFAULT_REQUEST_TIMEOUT;
use cprovider::adapters::mock::MockProvider;
use cprovider::{
    ModelProvider, NoopOperationHooks, ProviderError, ProviderKind, ProviderOperationHooks,
    RetryPolicy, SecretString, resolve_api_key,
};
use reqwest::Client;

/// Everything needed to construct one provider. Keys left as `None` are read from
/// the environment variables the provider kind documents.
#[derive(Clone)]
pub struct ProviderBuildConfig {
    pub kind: ProviderKind,
    pub model: Option<String>,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub retry_policy: RetryPolicy,
    pub hooks: Arc<dyn ProviderOperationHooks>,
}

impl std::fmt::Debug for ProviderBuildConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderBuildConfig")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl ProviderBuildConfig {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            model: None,
            api_key: None,
            base_url: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_policy: RetryPolicy::default(),
            hooks: Arc::new(NoopOperationHooks),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
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
}

/// Constructs the provider named by `config.kind`. Missing credentials surface here,
/// before any exchange runs.
pub fn build_provider(config: ProviderBuildConfig) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    match config.kind {
        ProviderKind::Mock => {
            let provider = match &config.model {
                Some(model) => MockProvider::new().with_model_name(model.clone()),
                None => MockProvider::new(),
            };
            Ok(Arc::new(provider))
        }
        ProviderKind::Primary => {
            let api_key = api_key_for(&config)?;
            let http = http_client(config.timeout)?;
            build_gemini_provider(config, api_key, http)
        }
        ProviderKind::Secondary => {
            let api_key = api_key_for(&config)?;
            let http = http_client(config.timeout)?;
            build_openai_provider(config, api_key, http)
        }
    }
}

fn api_key_for(config: &ProviderBuildConfig) -> Result<SecretString, ProviderError> {
    match &config.api_key {
        Some(api_key) if !api_key.is_empty() => Ok(api_key.clone()),
        Some(_) => Err(ProviderError::auth_or_config(
            "provider API key must not be empty",
        )),
        None => resolve_api_key(config.kind),
    }
}

fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ProviderError::auth_or_config(format!("http client setup failed: {err}")))
}

#[cfg(feature = "provider-gemini")]
fn build_gemini_provider(
    config: ProviderBuildConfig,
    api_key: SecretString,
    http: Client,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    use cprovider::adapters::gemini::{GeminiHttpTransport, GeminiProvider};

    let mut transport = GeminiHttpTransport::new(http);
    if let Some(base_url) = config.base_url {
        transport = transport.with_base_url(base_url);
    }

    let mut provider = GeminiProvider::new(api_key, Arc::new(transport))
        .with_retry_policy(config.retry_policy)
        .with_hooks(config.hooks);
    if let Some(model) = config.model {
        provider = provider.with_model(model);
    }
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "provider-gemini"))]
fn build_gemini_provider(
    _config: ProviderBuildConfig,
    _api_key: SecretString,
    _http: Client,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    Err(ProviderError::auth_or_config(
        "provider-gemini feature is not enabled on concierge",
    ))
}

#[cfg(feature = "provider-openai")]
fn build_openai_provider(
    config: ProviderBuildConfig,
    api_key: SecretString,
    http: Client,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    use cprovider::adapters::openai::{OpenAiHttpTransport, OpenAiProvider};

    let mut transport = OpenAiHttpTransport::new(http);
    if let Some(base_url) = config.base_url {
        transport = transport.with_base_url(base_url);
    }

    let mut provider = OpenAiProvider::new(api_key, Arc::new(transport))
        .with_retry_policy(config.retry_policy)
        .with_hooks(config.hooks);
    if let Some(model) = config.model {
        provider = provider.with_model(model);
    }
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "provider-openai"))]
fn build_openai_provider(
    _config: ProviderBuildConfig,
    _api_key: SecretString,
    _http: Client,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    Err(ProviderError::auth_or_config(
        "provider-openai feature is not enabled on concierge",
    ))
}

#[cfg(test)]
mod tests {
    use cprovider::ProviderErrorKind;
    use cprovider::adapters::mock::MOCK_MODEL_NAME;

    use super::*;

    #[test]
    fn mock_needs_no_credentials() {
        let provider = build_provider(ProviderBuildConfig::new(ProviderKind::Mock))
            .expect("mock should build");
        let identity = provider.identity();

        assert_eq!(identity.kind, ProviderKind::Mock);
        assert_eq!(identity.model_name, MOCK_MODEL_NAME);
    }

    #[test]
    fn blank_explicit_key_is_rejected() {
        let error = build_provider(ProviderBuildConfig::new(ProviderKind::Secondary).with_api_key("  "))
            .err()
            .expect("blank key should fail");

        assert_eq!(error.kind, ProviderErrorKind::AuthOrConfig);
    }

    #[test]
    fn timeout_defaults_to_the_adapter_request_bound() {
        let config = ProviderBuildConfig::new(ProviderKind::Primary);
        assert_eq!(config.timeout, DEFAULT_REQUEST_TIMEOUT);

        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[cfg(feature = "provider-gemini")]
    #[test]
    fn primary_uses_requested_model() {
        let provider = build_provider(
            ProviderBuildConfig::new(ProviderKind::Primary)
                .with_api_key("test-key")
                .with_model("gemini-2.5-pro"),
        )
        .expect("gemini should build");

        assert_eq!(provider.identity().kind, ProviderKind::Primary);
        assert_eq!(provider.identity().model_name, "gemini-2.5-pro");
    }

    #[cfg(feature = "provider-openai")]
    #[test]
    fn secondary_keeps_adapter_default_model() {
        let provider = build_provider(
            ProviderBuildConfig::new(ProviderKind::Secondary).with_api_key("test-key"),
        )
        .expect("openai should build");

        assert_eq!(provider.identity().kind, ProviderKind::Secondary);
        assert_eq!(
            provider.identity().model_name,
            cprovider::adapters::openai::OPENAI_DEFAULT_MODEL
        );
    }
}

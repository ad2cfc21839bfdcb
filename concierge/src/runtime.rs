//! Wiring from an [`AppConfig`] to a ready [`Orchestrator`].

use std::sync::Arc;

use cchat::{Orchestrator, Persona};
use cmemory::FilesystemSessionStore;
use cobserve::{SafeExchangeObserver, SafeProviderHooks, TracingObservabilityHooks};
use cprompt::TemplateStore;
use cprovider::ModelProvider;

use crate::{AppConfig, ConciergeError, ProviderBuildConfig, build_provider};

/// Provider settings derived from the app config, with tracing hooks attached.
pub fn provider_config(config: &AppConfig) -> ProviderBuildConfig {
    let mut provider = ProviderBuildConfig::new(config.provider)
        .with_retry_policy(config.retry_policy())
        .with_hooks(Arc::new(SafeProviderHooks::new(TracingObservabilityHooks)));
    if let Some(model) = &config.model {
        provider = provider.with_model(model.clone());
    }
    provider
}

pub async fn build_orchestrator(config: &AppConfig) -> Result<Orchestrator, ConciergeError> {
    let provider = build_provider(provider_config(config))?;
    build_orchestrator_with(config, provider).await
}

/// Same as [`build_orchestrator`] with a caller-supplied provider.
pub async fn build_orchestrator_with(
    config: &AppConfig,
    provider: Arc<dyn ModelProvider>,
) -> Result<Orchestrator, ConciergeError> {
    let templates = TemplateStore::new(&config.template_root)?;
    let store = Arc::new(FilesystemSessionStore::new(&config.history_root)?);

    let mut builder = Orchestrator::builder(provider, templates, store)
        .session_id(config.session_id.as_str())
        .persona(Persona::default().with_location(config.location.clone()))
        .observer(Arc::new(SafeExchangeObserver::new(TracingObservabilityHooks)));
    if let Some(tag) = &config.variant_tag {
        builder = builder.variant_tag(tag.clone());
    }
    if let Some(examples) = &config.examples {
        builder = builder.examples(examples.clone());
    }

    Ok(builder.build().await?)
}

//! Metrics-based observability hooks for provider attempts and exchanges.
//!
//! ```rust
//! use cobserve::MetricsObservabilityHooks;
//! use cprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use ccommon::SessionId;
use cchat::ExchangeObserver;
use cmemory::SessionStoreError;
use cprompt::TemplateError;
use cprovider::{ProviderError, ProviderIdentity, ProviderKind, ProviderOperationHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderKind, operation: &str, _attempt: u32) {
        metrics::counter!(
            "concierge_provider_attempt_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderKind,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "concierge_provider_retry_scheduled_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "concierge_provider_retry_delay_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, provider: ProviderKind, operation: &str, attempts: u32) {
        metrics::counter!(
            "concierge_provider_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "concierge_provider_attempts",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(
        &self,
        provider: ProviderKind,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "concierge_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind),
            "retryable" => error.retryable.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "concierge_provider_attempts",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }
}

impl ExchangeObserver for MetricsObservabilityHooks {
    fn on_exchange_start(&self, _session_id: &SessionId, provider: &ProviderIdentity) {
        metrics::counter!(
            "concierge_exchange_start_total",
            "provider" => provider.kind.to_string()
        )
        .increment(1);
    }

    fn on_exchange_success(
        &self,
        _session_id: &SessionId,
        provider: &ProviderIdentity,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "concierge_exchange_success_total",
            "provider" => provider.kind.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "concierge_exchange_duration_seconds",
            "provider" => provider.kind.to_string(),
            "outcome" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_template_failure(&self, _session_id: &SessionId, template: &str, error: &TemplateError) {
        metrics::counter!(
            "concierge_template_failure_total",
            "template" => template.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_generation_failure(
        &self,
        _session_id: &SessionId,
        provider: &ProviderIdentity,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "concierge_exchange_failure_total",
            "provider" => provider.kind.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "concierge_exchange_duration_seconds",
            "provider" => provider.kind.to_string(),
            "outcome" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_persistence_failure(
        &self,
        _session_id: &SessionId,
        error: &SessionStoreError,
        consecutive: u32,
    ) {
        metrics::counter!(
            "concierge_persistence_failure_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::gauge!("concierge_persistence_consecutive_failures").set(consecutive as f64);
    }

    fn on_persistence_alert(
        &self,
        _session_id: &SessionId,
        _error: &SessionStoreError,
        _consecutive: u32,
    ) {
        metrics::counter!("concierge_persistence_alert_total").increment(1);
    }
}

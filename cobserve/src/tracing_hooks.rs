//! Tracing-based observability hooks for provider attempts and exchanges.
//!
//! ```rust
//! use cchat::ExchangeObserver;
//! use cobserve::TracingObservabilityHooks;
//!
//! fn accepts_observer(_observer: &dyn ExchangeObserver) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_observer(&hooks);
//! ```

use std::time::Duration;

use ccommon::SessionId;
use cchat::ExchangeObserver;
use cmemory::SessionStoreError;
use cprompt::TemplateError;
use cprovider::{ProviderError, ProviderIdentity, ProviderKind, ProviderOperationHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderKind, operation: &str, attempt: u32) {
        tracing::debug!(
            phase = "provider",
            event = "attempt_start",
            provider = %provider,
            operation,
            attempt
        );
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderKind,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        tracing::warn!(
            phase = "provider",
            event = "retry_scheduled",
            provider = %provider,
            operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_success(&self, provider: ProviderKind, operation: &str, attempts: u32) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            attempts
        );
    }

    fn on_failure(
        &self,
        provider: ProviderKind,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            attempts,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl ExchangeObserver for TracingObservabilityHooks {
    fn on_exchange_start(&self, session_id: &SessionId, provider: &ProviderIdentity) {
        tracing::info!(
            phase = "exchange",
            event = "start",
            session_id = %session_id,
            provider = %provider
        );
    }

    fn on_exchange_success(
        &self,
        session_id: &SessionId,
        provider: &ProviderIdentity,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "exchange",
            event = "success",
            session_id = %session_id,
            provider = %provider,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_template_failure(&self, session_id: &SessionId, template: &str, error: &TemplateError) {
        tracing::error!(
            phase = "exchange",
            event = "template_failure",
            session_id = %session_id,
            template,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_generation_failure(
        &self,
        session_id: &SessionId,
        provider: &ProviderIdentity,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "exchange",
            event = "generation_failure",
            session_id = %session_id,
            provider = %provider,
            error_kind = ?error.kind,
            retryable = error.retryable,
            elapsed_ms = elapsed.as_millis() as u64,
            error = %error
        );
    }

    fn on_persistence_failure(
        &self,
        session_id: &SessionId,
        error: &SessionStoreError,
        consecutive: u32,
    ) {
        tracing::warn!(
            phase = "persistence",
            event = "save_failure",
            session_id = %session_id,
            consecutive,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_persistence_alert(
        &self,
        session_id: &SessionId,
        error: &SessionStoreError,
        consecutive: u32,
    ) {
        tracing::error!(
            phase = "persistence",
            event = "alert",
            session_id = %session_id,
            consecutive,
            error_kind = ?error.kind,
            error = %error,
            "conversation history has not been saved for {consecutive} consecutive exchanges"
        );
    }
}

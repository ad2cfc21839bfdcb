//! Observer contract for exchange and persistence events.

use std::time::Duration;

use ccommon::SessionId;
use cmemory::SessionStoreError;
use cprompt::TemplateError;
use cprovider::{ProviderError, ProviderIdentity};

/// Receives every exchange outcome. All methods default to no-ops.
pub trait ExchangeObserver: Send + Sync {
    fn on_exchange_start(&self, _session_id: &SessionId, _provider: &ProviderIdentity) {}

    fn on_exchange_success(
        &self,
        _session_id: &SessionId,
        _provider: &ProviderIdentity,
        _elapsed: Duration,
    ) {
    }

    fn on_template_failure(
        &self,
        _session_id: &SessionId,
        _template: &str,
        _error: &TemplateError,
    ) {
    }

    fn on_generation_failure(
        &self,
        _session_id: &SessionId,
        _provider: &ProviderIdentity,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
    }

    fn on_persistence_failure(
        &self,
        _session_id: &SessionId,
        _error: &SessionStoreError,
        _consecutive: u32,
    ) {
    }

    /// Fired for each persistence failure once `consecutive` reaches the alert threshold.
    fn on_persistence_alert(
        &self,
        _session_id: &SessionId,
        _error: &SessionStoreError,
        _consecutive: u32,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExchangeObserver;

impl ExchangeObserver for NoopExchangeObserver {}

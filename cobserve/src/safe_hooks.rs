use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use ccommon::SessionId;
use cchat::ExchangeObserver;
use cmemory::SessionStoreError;
use cprompt::TemplateError;
use cprovider::{ProviderError, ProviderIdentity, ProviderKind, ProviderOperationHooks};

/// Swallows panics raised by the wrapped provider hooks.
pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_attempt_start(&self, provider: ProviderKind, operation: &str, attempt: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_start(provider, operation, attempt)
        }));
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderKind,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_retry_scheduled(provider, operation, attempt, delay, error)
        }));
    }

    fn on_success(&self, provider: ProviderKind, operation: &str, attempts: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, attempts)
        }));
    }

    fn on_failure(
        &self,
        provider: ProviderKind,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(provider, operation, attempts, error)
        }));
    }
}

/// Swallows panics raised by the wrapped exchange observer.
pub struct SafeExchangeObserver<H> {
    inner: H,
}

impl<H> SafeExchangeObserver<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ExchangeObserver for SafeExchangeObserver<H>
where
    H: ExchangeObserver,
{
    fn on_exchange_start(&self, session_id: &SessionId, provider: &ProviderIdentity) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_exchange_start(session_id, provider)
        }));
    }

    fn on_exchange_success(
        &self,
        session_id: &SessionId,
        provider: &ProviderIdentity,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_exchange_success(session_id, provider, elapsed)
        }));
    }

    fn on_template_failure(&self, session_id: &SessionId, template: &str, error: &TemplateError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_template_failure(session_id, template, error)
        }));
    }

    fn on_generation_failure(
        &self,
        session_id: &SessionId,
        provider: &ProviderIdentity,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_generation_failure(session_id, provider, error, elapsed)
        }));
    }

    fn on_persistence_failure(
        &self,
        session_id: &SessionId,
        error: &SessionStoreError,
        consecutive: u32,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_persistence_failure(session_id, error, consecutive)
        }));
    }

    fn on_persistence_alert(
        &self,
        session_id: &SessionId,
        error: &SessionStoreError,
        consecutive: u32,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_persistence_alert(session_id, error, consecutive)
        }));
    }
}

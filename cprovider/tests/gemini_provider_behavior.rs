#![cfg(feature = "provider-gemini")]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cprovider::adapters::gemini::{
    GeminiProvider, GeminiRequest, GeminiResponse, GeminiRole, GeminiTransport,
};
use cprovider::{
    ModelProvider, ProviderError, ProviderErrorKind, ProviderFuture, ProviderKind,
    ProviderOperationHooks, RetryPolicy, SecretString, Turn,
};

#[derive(Debug, Default)]
struct FakeTransport {
    calls: Mutex<u32>,
    captured_key: Mutex<Option<String>>,
    captured_request: Mutex<Option<GeminiRequest>>,
    scripted: Mutex<VecDeque<Result<GeminiResponse, ProviderError>>>,
    fallback: Mutex<Option<ProviderError>>,
}

impl FakeTransport {
    fn scripted(results: Vec<Result<GeminiResponse, ProviderError>>) -> Self {
        Self {
            scripted: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    fn always_failing(error: ProviderError) -> Self {
        Self {
            fallback: Mutex::new(Some(error)),
            ..Self::default()
        }
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().expect("calls lock")
    }
}

impl GeminiTransport for FakeTransport {
    fn generate_content<'a>(
        &'a self,
        request: GeminiRequest,
        api_key: SecretString,
    ) -> ProviderFuture<'a, Result<GeminiResponse, ProviderError>> {
        Box::pin(async move {
            *self.calls.lock().expect("calls lock") += 1;
            *self.captured_key.lock().expect("key lock") = Some(api_key.expose().to_string());
            *self.captured_request.lock().expect("request lock") = Some(request);

            if let Some(next) = self.scripted.lock().expect("scripted lock").pop_front() {
                return next;
            }

            match self.fallback.lock().expect("fallback lock").clone() {
                Some(error) => Err(error),
                None => Ok(reply("default")),
            }
        })
    }
}

#[derive(Default)]
struct CountingHooks {
    retries: Mutex<Vec<u32>>,
    failures: Mutex<Vec<(ProviderKind, u32)>>,
}

impl ProviderOperationHooks for CountingHooks {
    fn on_retry_scheduled(
        &self,
        _provider: ProviderKind,
        _operation: &str,
        attempt: u32,
        _delay: Duration,
        _error: &ProviderError,
    ) {
        self.retries.lock().expect("retries lock").push(attempt);
    }

    fn on_failure(
        &self,
        provider: ProviderKind,
        _operation: &str,
        attempts: u32,
        _error: &ProviderError,
    ) {
        self.failures
            .lock()
            .expect("failures lock")
            .push((provider, attempts));
    }
}

fn reply(text: &str) -> GeminiResponse {
    GeminiResponse {
        text: text.to_string(),
        finish_reason: Some("STOP".to_string()),
    }
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts).with_backoff(Duration::ZERO, Duration::ZERO, 1.0)
}

#[tokio::test]
async fn generate_sends_key_history_and_system_instruction() {
    let transport = Arc::new(FakeTransport::scripted(vec![Ok(reply("On it, boss."))]));
    let provider = GeminiProvider::new(SecretString::new("g-key"), transport.clone());

    let turns = vec![Turn::user("status report")];
    let text = provider
        .generate("You are Giulia.", &turns)
        .await
        .expect("generation should succeed");

    assert_eq!(text, "On it, boss.");
    assert_eq!(transport.calls(), 1);
    assert_eq!(
        transport.captured_key.lock().expect("key lock").as_deref(),
        Some("g-key")
    );

    let request = transport
        .captured_request
        .lock()
        .expect("request lock")
        .clone()
        .expect("request should be captured");
    assert_eq!(request.model, "gemini-3-flash-preview");
    assert_eq!(request.system_instruction, "You are Giulia.");
    assert_eq!(request.contents.len(), 1);
    assert_eq!(request.contents[0].role, GeminiRole::User);
}

#[tokio::test]
async fn always_overloaded_backend_is_called_exactly_max_attempts_times() {
    let transport = Arc::new(FakeTransport::always_failing(ProviderError::overloaded(
        "UNAVAILABLE: model overloaded",
    )));
    let hooks = Arc::new(CountingHooks::default());
    let provider = GeminiProvider::new(SecretString::new("g-key"), transport.clone())
        .with_retry_policy(fast_policy(3))
        .with_hooks(hooks.clone());

    let error = provider
        .generate("sys", &[Turn::user("hi")])
        .await
        .expect_err("overload should surface after retries");

    assert_eq!(error.kind, ProviderErrorKind::TransientBackendOverload);
    assert_eq!(transport.calls(), 3);
    assert_eq!(*hooks.retries.lock().expect("retries lock"), vec![1, 2]);
    assert_eq!(
        *hooks.failures.lock().expect("failures lock"),
        vec![(ProviderKind::Primary, 3)]
    );
}

#[tokio::test]
async fn overload_then_success_returns_the_reply() {
    let transport = Arc::new(FakeTransport::scripted(vec![
        Err(ProviderError::overloaded("busy")),
        Ok(reply("Back online, boss.")),
    ]));
    let provider = GeminiProvider::new(SecretString::new("g-key"), transport.clone())
        .with_retry_policy(fast_policy(3));

    let text = provider
        .generate("sys", &[Turn::user("hi")])
        .await
        .expect("second attempt should succeed");

    assert_eq!(text, "Back online, boss.");
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn auth_failures_are_not_retried() {
    let transport = Arc::new(FakeTransport::always_failing(
        ProviderError::auth_or_config("API key not valid"),
    ));
    let provider = GeminiProvider::new(SecretString::new("bad"), transport.clone())
        .with_retry_policy(fast_policy(5));

    let error = provider
        .generate("sys", &[Turn::user("hi")])
        .await
        .expect_err("auth failure should surface");

    assert_eq!(error.kind, ProviderErrorKind::AuthOrConfig);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn empty_system_instruction_is_rejected_before_any_call() {
    let transport = Arc::new(FakeTransport::default());
    let provider = GeminiProvider::new(SecretString::new("g-key"), transport.clone());

    let error = provider
        .generate("   ", &[Turn::user("hi")])
        .await
        .expect_err("blank instruction should fail");

    assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn identity_reports_primary_kind_and_configured_model() {
    let provider = GeminiProvider::new(
        SecretString::new("g-key"),
        Arc::new(FakeTransport::default()),
    )
    .with_model("gemini-2.5-pro");

    let identity = provider.identity();
    assert_eq!(identity.kind, ProviderKind::Primary);
    assert_eq!(identity.model_name, "gemini-2.5-pro");
}

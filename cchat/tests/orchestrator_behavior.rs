use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ccommon::{BoxFuture, SessionId};
use cchat::prelude::*;
use chrono::NaiveTime;
use cmemory::{InMemorySessionStore, SessionStore, SessionStoreError};
use cprompt::{TemplateError, TemplateStore};
use cprovider::adapters::mock::{MOCK_REPLY, MockProvider};
use cprovider::{
    ModelProvider, ProviderError, ProviderFuture, ProviderIdentity, ProviderKind, Role, Turn,
};
use tempfile::TempDir;

const OVERLOAD: &str = "The line to headquarters is jammed, boss. Give me a moment and try again.";
const GENERIC: &str = "Something went wrong in the office. Check the logs, boss?";

fn prompt_root() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "core/giulia_assistant.txt",
        "You are Giulia. It is {current_time} and you are in {location}.",
    );
    write(dir.path(), "core/boss_wrapper.txt", "Boss says: {message}");
    dir
}

fn write(root: &Path, relative: &str, body: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(path, body).expect("write asset");
}

fn templates(dir: &TempDir) -> TemplateStore {
    TemplateStore::new(dir.path()).expect("template store")
}

fn nine_fifteen() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 15, 0).expect("valid time")
}

/// Replays scripted results, then repeats the last one; records what it was sent.
#[derive(Default)]
struct ScriptedProvider {
    results: Mutex<Vec<Result<String, ProviderError>>>,
    calls: Mutex<Vec<(String, Vec<Turn>)>>,
}

impl ScriptedProvider {
    fn new(results: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Vec<Turn>)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl ModelProvider for ScriptedProvider {
    fn identity(&self) -> ProviderIdentity {
        ProviderIdentity::new(ProviderKind::Primary, "scripted-model")
    }

    fn generate<'a>(
        &'a self,
        system_instruction: &'a str,
        turns: &'a [Turn],
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            self.calls
                .lock()
                .expect("calls lock")
                .push((system_instruction.to_string(), turns.to_vec()));
            let mut results = self.results.lock().expect("results lock");
            if results.len() > 1 {
                results.remove(0)
            } else {
                results
                    .first()
                    .cloned()
                    .unwrap_or_else(|| Ok("default reply".to_string()))
            }
        })
    }
}

/// Fails the first `failures` saves, then delegates to an in-memory store.
struct FlakyStore {
    remaining_failures: Mutex<u32>,
    inner: InMemorySessionStore,
}

impl FlakyStore {
    fn failing(failures: u32) -> Self {
        Self {
            remaining_failures: Mutex::new(failures),
            inner: InMemorySessionStore::new(),
        }
    }
}

impl SessionStore for FlakyStore {
    fn load<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<Turn>, SessionStoreError>> {
        self.inner.load(session_id)
    }

    fn save<'a>(
        &'a self,
        session_id: &'a SessionId,
        turns: &'a [Turn],
    ) -> BoxFuture<'a, Result<(), SessionStoreError>> {
        Box::pin(async move {
            {
                let mut remaining = self.remaining_failures.lock().expect("failures lock");
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(SessionStoreError::storage("disk full"));
                }
            }
            self.inner.save(session_id, turns).await
        })
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.lock().expect("events lock").clone()
    }

    fn push(&self, event: String) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl ExchangeObserver for RecordingObserver {
    fn on_exchange_start(&self, session_id: &SessionId, _provider: &ProviderIdentity) {
        self.push(format!("start:{session_id}"));
    }

    fn on_exchange_success(
        &self,
        _session_id: &SessionId,
        _provider: &ProviderIdentity,
        _elapsed: Duration,
    ) {
        self.push("success".to_string());
    }

    fn on_template_failure(&self, _session_id: &SessionId, template: &str, error: &TemplateError) {
        self.push(format!("template:{template}:{:?}", error.kind));
    }

    fn on_generation_failure(
        &self,
        _session_id: &SessionId,
        _provider: &ProviderIdentity,
        error: &ProviderError,
        _elapsed: Duration,
    ) {
        self.push(format!("generation:{:?}", error.kind));
    }

    fn on_persistence_failure(
        &self,
        _session_id: &SessionId,
        _error: &SessionStoreError,
        consecutive: u32,
    ) {
        self.push(format!("persistence:{consecutive}"));
    }

    fn on_persistence_alert(
        &self,
        _session_id: &SessionId,
        _error: &SessionStoreError,
        consecutive: u32,
    ) {
        self.push(format!("alert:{consecutive}"));
    }
}

#[tokio::test]
async fn fresh_session_status_report_persists_exactly_two_turns() {
    let dir = prompt_root();
    let store = Arc::new(InMemorySessionStore::new());
    let provider = Arc::new(ScriptedProvider::new(vec![Ok("All quiet, boss.".into())]));

    let mut orchestrator = Orchestrator::builder(provider.clone(), templates(&dir), store.clone())
        .session_id("fresh")
        .clock_time(nine_fifteen())
        .build()
        .await
        .expect("build");

    assert_eq!(
        orchestrator.system_instruction(),
        "You are Giulia. It is 09:15 AM and you are in your private office."
    );

    let reply = orchestrator.handle("status report").await;
    assert_eq!(reply, "All quiet, boss.");

    let persisted = store.load(&SessionId::from("fresh")).await.expect("load");
    assert_eq!(
        persisted,
        vec![
            Turn::user("Boss says: status report"),
            Turn::model("All quiet, boss."),
        ]
    );

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.starts_with("You are Giulia."));
    assert_eq!(calls[0].1, vec![Turn::user("Boss says: status report")]);
}

#[tokio::test]
async fn mock_provider_two_messages_yield_distinct_users_and_identical_replies() {
    let dir = prompt_root();
    let store = Arc::new(InMemorySessionStore::new());

    let mut orchestrator =
        Orchestrator::builder(Arc::new(MockProvider::new()), templates(&dir), store.clone())
            .session_id("mock")
            .build()
            .await
            .expect("build");

    assert_eq!(orchestrator.handle("first").await, MOCK_REPLY);
    assert_eq!(orchestrator.handle("second").await, MOCK_REPLY);

    let turns = store.load(&SessionId::from("mock")).await.expect("load");
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0].text, "Boss says: first");
    assert_eq!(turns[2].text, "Boss says: second");
    assert_eq!(turns[1], turns[3]);
    assert_eq!(turns[1].role, Role::Model);
}

#[tokio::test]
async fn failed_generation_retains_user_turn_without_model_turn() {
    let dir = prompt_root();
    let store = Arc::new(InMemorySessionStore::new());
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok("Morning, boss.".into()),
        Err(ProviderError::auth_or_config("API key not valid")),
    ]));
    let observer = Arc::new(RecordingObserver::default());

    let mut orchestrator = Orchestrator::builder(provider, templates(&dir), store.clone())
        .session_id("atomic")
        .observer(observer.clone())
        .build()
        .await
        .expect("build");

    orchestrator.handle("good morning").await;
    let outcome = orchestrator.exchange("what's on today?").await;

    assert_eq!(outcome.reply, GENERIC);
    assert_eq!(outcome.status, ExchangeStatus::Failed);
    assert!(outcome.persisted);

    let persisted = store.load(&SessionId::from("atomic")).await.expect("load");
    assert_eq!(persisted.len(), 3);
    assert_eq!(
        persisted.last(),
        Some(&Turn::user("Boss says: what's on today?"))
    );
    assert_eq!(orchestrator.turns(), persisted.as_slice());
    assert!(
        observer
            .events()
            .contains(&"generation:AuthOrConfig".to_string())
    );
}

#[tokio::test]
async fn overload_returns_try_again_apology() {
    let dir = prompt_root();
    let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::overloaded(
        "UNAVAILABLE",
    ))]));

    let mut orchestrator = Orchestrator::builder(
        provider,
        templates(&dir),
        Arc::new(InMemorySessionStore::new()),
    )
    .build()
    .await
    .expect("build");

    let outcome = orchestrator.exchange("anyone there?").await;
    assert_eq!(outcome.reply, OVERLOAD);
    assert_eq!(outcome.status, ExchangeStatus::Overloaded);
    assert_eq!(orchestrator.session_id().as_str(), DEFAULT_SESSION_ID);
}

#[tokio::test]
async fn turn_template_failure_appends_and_persists_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "core/giulia_assistant.txt", "You are Giulia.");
    write(dir.path(), "core/boss_wrapper.txt", "{message} at {undefined}");
    let store = Arc::new(InMemorySessionStore::new());
    let provider = Arc::new(ScriptedProvider::default());
    let observer = Arc::new(RecordingObserver::default());

    let mut orchestrator = Orchestrator::builder(provider.clone(), templates(&dir), store.clone())
        .session_id("broken-wrapper")
        .observer(observer.clone())
        .build()
        .await
        .expect("build");

    let outcome = orchestrator.exchange("hello").await;
    assert_eq!(outcome.reply, GENERIC);
    assert!(!outcome.persisted);
    assert!(orchestrator.turns().is_empty());
    assert!(provider.calls().is_empty());
    assert_eq!(store.session_count(), 0);
    assert!(
        observer
            .events()
            .contains(&"template:core/boss_wrapper:MissingVariable".to_string())
    );
}

#[tokio::test]
async fn persistence_failures_never_change_the_reply_and_alert_after_threshold() {
    let dir = prompt_root();
    let store = Arc::new(FlakyStore::failing(3));
    let observer = Arc::new(RecordingObserver::default());
    let provider = Arc::new(ScriptedProvider::new(vec![Ok("Noted.".into())]));

    let mut orchestrator = Orchestrator::builder(provider, templates(&dir), store.clone())
        .session_id("flaky")
        .observer(observer.clone())
        .persistence_alert_threshold(2)
        .build()
        .await
        .expect("build");

    for _ in 0..3 {
        let outcome = orchestrator.exchange("note this").await;
        assert_eq!(outcome.reply, "Noted.");
        assert!(!outcome.persisted);
    }
    assert_eq!(orchestrator.consecutive_persistence_failures(), 3);

    let outcome = orchestrator.exchange("and this").await;
    assert!(outcome.persisted);
    assert_eq!(orchestrator.consecutive_persistence_failures(), 0);

    let events = observer.events();
    let alerts = events
        .iter()
        .filter(|event| event.starts_with("alert:"))
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(alerts, vec!["alert:2".to_string(), "alert:3".to_string()]);

    let persisted = store.load(&SessionId::from("flaky")).await.expect("load");
    assert_eq!(persisted.len(), 8);
}

#[tokio::test]
async fn existing_history_is_loaded_and_sent_to_the_provider() {
    let dir = prompt_root();
    let store = Arc::new(InMemorySessionStore::new());
    let session = SessionId::from("returning");
    store
        .save(
            &session,
            &[Turn::user("Boss says: yesterday"), Turn::model("Done.")],
        )
        .await
        .expect("seed history");
    let provider = Arc::new(ScriptedProvider::new(vec![Ok("Welcome back.".into())]));

    let mut orchestrator = Orchestrator::builder(provider.clone(), templates(&dir), store)
        .session_id(session)
        .build()
        .await
        .expect("build");
    assert_eq!(orchestrator.turns().len(), 2);

    orchestrator.handle("today").await;
    let calls = provider.calls();
    assert_eq!(calls[0].1.len(), 3);
    assert_eq!(calls[0].1[0].text, "Boss says: yesterday");
}

#[tokio::test]
async fn variant_tag_defaults_to_model_name_and_examples_are_never_persisted() {
    let dir = prompt_root();
    write(
        dir.path(),
        "core/boss_wrapper_scripted-model.txt",
        "[scripted] {message}",
    );
    write(
        dir.path(),
        "core/examples.json",
        r#"[{"role":"user","text":"coffee"},{"role":"model","text":"Right away."}]"#,
    );
    let store = Arc::new(InMemorySessionStore::new());
    let provider = Arc::new(ScriptedProvider::new(vec![Ok("ok".into())]));

    let mut orchestrator = Orchestrator::builder(provider.clone(), templates(&dir), store.clone())
        .session_id("tagged")
        .examples("core/examples")
        .build()
        .await
        .expect("build");
    assert_eq!(orchestrator.variant_tag(), "scripted-model");

    orchestrator.handle("hi").await;

    let sent = &provider.calls()[0].1;
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].text, "coffee");
    assert_eq!(sent[2].text, "[scripted] hi");

    let persisted = store.load(&SessionId::from("tagged")).await.expect("load");
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0].text, "[scripted] hi");
}

#[tokio::test]
async fn extra_system_vars_and_persona_location_are_rendered() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "core/giulia_assistant.txt",
        "{location} / {current_time} / {mood}",
    );
    write(dir.path(), "core/boss_wrapper.txt", "{message}");

    let orchestrator = Orchestrator::builder(
        Arc::new(MockProvider::new()),
        templates(&dir),
        Arc::new(InMemorySessionStore::new()),
    )
    .persona(Persona::default().with_location("the rooftop bar"))
    .system_var("mood", "cheerful")
    .clock_time(NaiveTime::from_hms_opt(21, 5, 0).expect("valid time"))
    .build()
    .await
    .expect("build");

    assert_eq!(
        orchestrator.system_instruction(),
        "the rooftop bar / 09:05 PM / cheerful"
    );
}

#[tokio::test]
async fn build_fails_when_system_template_cannot_render() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "core/giulia_assistant.txt", "{secret_agenda}");
    write(dir.path(), "core/boss_wrapper.txt", "{message}");

    let error = Orchestrator::builder(
        Arc::new(MockProvider::new()),
        templates(&dir),
        Arc::new(InMemorySessionStore::new()),
    )
    .build()
    .await
    .err()
    .expect("missing variable must fail the build");

    assert_eq!(error.kind, ChatErrorKind::Template);
}

#[tokio::test]
async fn build_fails_when_history_cannot_be_read() {
    let dir = prompt_root();
    let history = tempfile::tempdir().expect("tempdir");
    fs::write(history.path().join("corrupt.json"), "[{").expect("write corrupt history");
    let store = Arc::new(cmemory::FilesystemSessionStore::new(history.path()).expect("store"));

    let error = Orchestrator::builder(Arc::new(MockProvider::new()), templates(&dir), store)
        .session_id("corrupt")
        .build()
        .await
        .err()
        .expect("unreadable history must fail the build");

    assert_eq!(error.kind, ChatErrorKind::Store);
}

#[tokio::test]
async fn build_rejects_a_blank_system_instruction() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "core/giulia_assistant.txt", "  \n\t\n");
    write(dir.path(), "core/boss_wrapper.txt", "{message}");

    let error = Orchestrator::builder(
        Arc::new(MockProvider::new()),
        templates(&dir),
        Arc::new(InMemorySessionStore::new()),
    )
    .build()
    .await
    .err()
    .expect("blank system instruction must fail the build");

    assert_eq!(error.kind, ChatErrorKind::Template);
    assert!(error.message.contains("core/giulia_assistant"));
}

/// Formatted log output shared with the subscriber installed for one test thread.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("logs lock")).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("logs lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn save_failures_are_logged_with_the_default_observer() {
    let (logs, _guard) = CapturedLogs::install();
    let dir = prompt_root();
    let provider = Arc::new(ScriptedProvider::new(vec![Ok("Noted.".into())]));

    let mut orchestrator =
        Orchestrator::builder(provider, templates(&dir), Arc::new(FlakyStore::failing(3)))
            .session_id("unobserved")
            .build()
            .await
            .expect("build");

    for _ in 0..3 {
        assert!(!orchestrator.exchange("note this").await.persisted);
    }

    let text = logs.text();
    assert_eq!(text.matches("history save failed").count(), 3);
    assert_eq!(
        text.matches("history has not been saved for 3 consecutive exchanges")
            .count(),
        1
    );
    assert!(text.contains("session_id=unobserved"));
    assert!(text.contains("error_kind=Storage"));
}

#[tokio::test]
async fn generation_failures_are_logged_with_the_default_observer() {
    let (logs, _guard) = CapturedLogs::install();
    let dir = prompt_root();
    let provider = Arc::new(ScriptedProvider::new(vec![Err(
        ProviderError::auth_or_config("invalid api key"),
    )]));

    let mut orchestrator =
        Orchestrator::builder(provider, templates(&dir), Arc::new(InMemorySessionStore::new()))
            .build()
            .await
            .expect("build");

    let outcome = orchestrator.exchange("status report").await;
    assert_eq!(outcome.status, ExchangeStatus::Failed);

    let text = logs.text();
    assert!(text.contains("model call failed"));
    assert!(text.contains("error_kind=AuthOrConfig"));
    assert!(text.contains("invalid api key"));
}

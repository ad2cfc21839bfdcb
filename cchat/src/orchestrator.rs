//! Session-bound conversation loop over a provider, template store and session store.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use ccommon::SessionId;
use chrono::{Local, NaiveTime};
use cmemory::SessionStore;
use cprompt::{TemplateStore, TemplateVars};
use cprovider::{ModelProvider, ProviderIdentity, Turn};
use tracing::{debug, error, info, warn};

use crate::{
    ChatError, DEFAULT_PERSISTENCE_ALERT_THRESHOLD, DEFAULT_SESSION_ID, ExchangeObserver,
    ExchangeOutcome, ExchangeStatus, NoopExchangeObserver, Persona,
};

const TIME_FORMAT: &str = "%I:%M %p";

pub struct OrchestratorBuilder {
    provider: Arc<dyn ModelProvider>,
    templates: TemplateStore,
    store: Arc<dyn SessionStore>,
    session_id: SessionId,
    variant_tag: Option<String>,
    persona: Persona,
    extra_vars: TemplateVars,
    examples_path: Option<String>,
    clock_time: Option<NaiveTime>,
    observer: Arc<dyn ExchangeObserver>,
    persistence_alert_threshold: u32,
}

impl OrchestratorBuilder {
    pub fn session_id(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Overrides the variant tag, which otherwise defaults to the provider's model name.
    pub fn variant_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.variant_tag = (!tag.trim().is_empty()).then_some(tag);
        self
    }

    pub fn persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Extra system-instruction variables. They win over the built-in ones.
    pub fn system_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_vars.insert(name, value);
        self
    }

    pub fn examples(mut self, path: impl Into<String>) -> Self {
        self.examples_path = Some(path.into());
        self
    }

    /// Fixes `current_time` instead of reading the wall clock at build.
    pub fn clock_time(mut self, time: NaiveTime) -> Self {
        self.clock_time = Some(time);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ExchangeObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn persistence_alert_threshold(mut self, threshold: u32) -> Self {
        self.persistence_alert_threshold = threshold.max(1);
        self
    }

    pub async fn build(self) -> Result<Orchestrator, ChatError> {
        let identity = self.provider.identity();
        let variant_tag = self
            .variant_tag
            .unwrap_or_else(|| identity.model_name.clone());

        let current_time = self
            .clock_time
            .unwrap_or_else(|| Local::now().time())
            .format(TIME_FORMAT)
            .to_string();
        let mut vars = TemplateVars::new()
            .with("current_time", current_time)
            .with("location", self.persona.location.clone());
        vars.extend(self.extra_vars.iter());

        let system_instruction = self.templates.resolve(
            &self.persona.system_template,
            Some(&variant_tag),
            &vars,
        )?;
        if system_instruction.trim().is_empty() {
            return Err(ChatError::template(format!(
                "system template '{}' rendered to an empty instruction",
                self.persona.system_template
            )));
        }

        let examples = match &self.examples_path {
            Some(path) => self.templates.load_examples(path)?,
            None => Vec::new(),
        };

        let turns = self.store.load(&self.session_id).await?;

        info!(
            phase = "orchestrator",
            event = "ready",
            session_id = %self.session_id,
            provider = %identity,
            variant_tag = %variant_tag,
            history_turns = turns.len(),
            examples = examples.len(),
            "orchestrator ready"
        );

        Ok(Orchestrator {
            provider: self.provider,
            identity,
            templates: self.templates,
            store: self.store,
            session_id: self.session_id,
            variant_tag,
            persona: self.persona,
            system_instruction,
            examples,
            turns,
            observer: self.observer,
            persistence_alert_threshold: self.persistence_alert_threshold,
            consecutive_persistence_failures: 0,
        })
    }
}

/// Binds one provider, one template store and one session store to a single session.
///
/// Exchanges run one at a time through `&mut self`. The system instruction is rendered
/// once at build and never persisted.
pub struct Orchestrator {
    provider: Arc<dyn ModelProvider>,
    identity: ProviderIdentity,
    templates: TemplateStore,
    store: Arc<dyn SessionStore>,
    session_id: SessionId,
    variant_tag: String,
    persona: Persona,
    system_instruction: String,
    examples: Vec<Turn>,
    turns: Vec<Turn>,
    observer: Arc<dyn ExchangeObserver>,
    persistence_alert_threshold: u32,
    consecutive_persistence_failures: u32,
}

impl Orchestrator {
    pub fn builder(
        provider: Arc<dyn ModelProvider>,
        templates: TemplateStore,
        store: Arc<dyn SessionStore>,
    ) -> OrchestratorBuilder {
        OrchestratorBuilder {
            provider,
            templates,
            store,
            session_id: SessionId::from(DEFAULT_SESSION_ID),
            variant_tag: None,
            persona: Persona::default(),
            extra_vars: TemplateVars::new(),
            examples_path: None,
            clock_time: None,
            observer: Arc::new(NoopExchangeObserver),
            persistence_alert_threshold: DEFAULT_PERSISTENCE_ALERT_THRESHOLD,
        }
    }

    /// Runs one exchange and returns only the text to show the operator.
    pub async fn handle(&mut self, text: &str) -> String {
        self.exchange(text).await.reply
    }

    pub async fn exchange(&mut self, text: &str) -> ExchangeOutcome {
        let started = Instant::now();
        self.observer
            .on_exchange_start(&self.session_id, &self.identity);

        let vars = TemplateVars::new().with("message", text);
        let wrapped = match self.templates.resolve(
            &self.persona.turn_template,
            Some(&self.variant_tag),
            &vars,
        ) {
            Ok(wrapped) => wrapped,
            Err(error) => {
                warn!(
                    phase = "exchange",
                    event = "template_failure",
                    session_id = %self.session_id,
                    template = %self.persona.turn_template,
                    error_kind = ?error.kind,
                    error = %error,
                    "turn wrapper failed to render"
                );
                self.observer.on_template_failure(
                    &self.session_id,
                    &self.persona.turn_template,
                    &error,
                );
                return ExchangeOutcome {
                    reply: self.persona.generic_apology.clone(),
                    status: ExchangeStatus::Failed,
                    persisted: false,
                };
            }
        };

        self.turns.push(Turn::user(wrapped));

        let generated = {
            let context = self.provider_context();
            self.provider
                .generate(&self.system_instruction, &context)
                .await
        };

        match generated {
            Ok(reply) => {
                self.turns.push(Turn::model(reply.clone()));
                let persisted = self.persist().await;
                self.observer.on_exchange_success(
                    &self.session_id,
                    &self.identity,
                    started.elapsed(),
                );
                ExchangeOutcome {
                    reply,
                    status: ExchangeStatus::Replied,
                    persisted,
                }
            }
            Err(error) => {
                warn!(
                    phase = "exchange",
                    event = "generation_failure",
                    session_id = %self.session_id,
                    provider = %self.identity,
                    error_kind = ?error.kind,
                    retryable = error.retryable,
                    error = %error,
                    "model call failed"
                );
                self.observer.on_generation_failure(
                    &self.session_id,
                    &self.identity,
                    &error,
                    started.elapsed(),
                );
                // the user turn stays so the input survives a restart
                let persisted = self.persist().await;
                let (reply, status) = if error.is_overload() {
                    (
                        self.persona.overload_apology.clone(),
                        ExchangeStatus::Overloaded,
                    )
                } else {
                    (self.persona.generic_apology.clone(), ExchangeStatus::Failed)
                };
                ExchangeOutcome {
                    reply,
                    status,
                    persisted,
                }
            }
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn examples(&self) -> &[Turn] {
        &self.examples
    }

    pub fn provider_identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    pub fn variant_tag(&self) -> &str {
        &self.variant_tag
    }

    pub fn consecutive_persistence_failures(&self) -> u32 {
        self.consecutive_persistence_failures
    }

    fn provider_context(&self) -> Cow<'_, [Turn]> {
        if self.examples.is_empty() {
            Cow::Borrowed(&self.turns)
        } else {
            Cow::Owned(
                self.examples
                    .iter()
                    .chain(self.turns.iter())
                    .cloned()
                    .collect(),
            )
        }
    }

    async fn persist(&mut self) -> bool {
        match self.store.save(&self.session_id, &self.turns).await {
            Ok(()) => {
                self.consecutive_persistence_failures = 0;
                debug!(session_id = %self.session_id, turns = self.turns.len(), "history persisted");
                true
            }
            Err(error) => {
                self.consecutive_persistence_failures += 1;
                let consecutive = self.consecutive_persistence_failures;
                warn!(
                    phase = "persistence",
                    event = "save_failure",
                    session_id = %self.session_id,
                    error_kind = ?error.kind,
                    consecutive,
                    error = %error,
                    "history save failed"
                );
                self.observer
                    .on_persistence_failure(&self.session_id, &error, consecutive);
                if consecutive >= self.persistence_alert_threshold {
                    error!(
                        phase = "persistence",
                        event = "alert",
                        session_id = %self.session_id,
                        error_kind = ?error.kind,
                        consecutive,
                        threshold = self.persistence_alert_threshold,
                        "history has not been saved for {consecutive} consecutive exchanges"
                    );
                    self.observer
                        .on_persistence_alert(&self.session_id, &error, consecutive);
                }
                false
            }
        }
    }
}

//! Unified facade over the concierge workspace crates.
//!
//! Applications depend on this crate alone: it re-exports the provider, template,
//! history, orchestration and observability crates, loads [`AppConfig`], and wires
//! everything into a ready [`Orchestrator`].
//!
//! ```rust,no_run
//! use concierge::{AppConfig, ConfigOverrides, build_orchestrator};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), concierge::ConciergeError> {
//! let overrides = ConfigOverrides {
//!     mock: true,
//!     ..ConfigOverrides::default()
//! };
//! let config = AppConfig::load(None, &overrides)?;
//! let mut orchestrator = build_orchestrator(&config).await?;
//! println!("{}", orchestrator.handle("status report").await);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;

pub mod prelude;
pub mod providers;
pub mod runtime;

pub use cchat;
pub use ccommon;
pub use cmemory;
pub use cobserve;
pub use cprompt;
pub use cprovider;

pub use cchat::{
    ChatError, ChatErrorKind, ExchangeObserver, ExchangeOutcome, ExchangeStatus,
    NoopExchangeObserver, Orchestrator, OrchestratorBuilder, Persona,
};
pub use ccommon::{BoxFuture, SessionId};
pub use cmemory::{
    FilesystemSessionStore, InMemorySessionStore, SessionStore, SessionStoreError,
    SessionStoreErrorKind,
};
pub use cobserve::{
    MetricsObservabilityHooks, SafeExchangeObserver, SafeProviderHooks,
    TracingObservabilityHooks,
};
pub use cprompt::{TemplateError, TemplateErrorKind, TemplateStore, TemplateVars};
pub use cprovider::{
    ModelProvider, NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderIdentity,
    ProviderKind, ProviderOperationHooks, RetryPolicy, Role, SecretString, Turn,
};

pub use config::{
    AppConfig, ConfigOverrides, DEFAULT_CONFIG_FILE, DEFAULT_HISTORY_ROOT, DEFAULT_LOCATION,
    DEFAULT_LOG_DIR, DEFAULT_TEMPLATE_ROOT, HISTORY_ROOT_ENV, MODEL_ENV, PROVIDER_ENV,
    RetrySettings, SESSION_ENV, TEMPLATE_ROOT_ENV,
};
pub use error::{ConciergeError, ConciergeErrorKind};
pub use providers::{ProviderBuildConfig, build_provider};
pub use runtime::{build_orchestrator, build_orchestrator_with, provider_config};

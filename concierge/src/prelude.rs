//! Common imports for most concierge applications.

pub use crate::{
    AppConfig, ConciergeError, ConciergeErrorKind, ConfigOverrides, ProviderBuildConfig,
    build_orchestrator, build_orchestrator_with, build_provider,
};
pub use crate::{
    ExchangeObserver, ExchangeOutcome, ExchangeStatus, ModelProvider, Orchestrator, Persona,
    ProviderError, ProviderKind, RetryPolicy, Role, SessionId, SessionStore, TemplateStore,
    TemplateVars, Turn,
};

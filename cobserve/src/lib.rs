//! Production-friendly observability hooks for provider attempts and conversation exchanges.
//!
//! ```rust
//! use cobserve::{MetricsObservabilityHooks, SafeExchangeObserver, SafeProviderHooks, TracingObservabilityHooks};
//!
//! let _provider_hooks = SafeProviderHooks::new(TracingObservabilityHooks);
//! let _observer = SafeExchangeObserver::new(MetricsObservabilityHooks);
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeExchangeObserver, SafeProviderHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeExchangeObserver, SafeProviderHooks,
        TracingObservabilityHooks,
    };
}

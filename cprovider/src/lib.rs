//! Provider abstraction for the concierge orchestrator.
//!
//! A [`ModelProvider`] turns a system instruction plus ordered [`Turn`]s into one reply.
//! Network adapters wrap their transport in [`execute_with_retry`] so transient backend
//! overload is retried with bounded exponential backoff.
//!
//! ```rust
//! use cprovider::adapters::mock::{MOCK_REPLY, MockProvider};
//! use cprovider::{ModelProvider, ProviderKind, Turn};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new();
//! assert_eq!(provider.identity().kind, ProviderKind::Mock);
//!
//! let reply = provider
//!     .generate("You are a helpful assistant.", &[Turn::user("hi")])
//!     .await
//!     .expect("mock never fails on a valid instruction");
//! assert_eq!(reply, MOCK_REPLY);
//! # }
//! ```

pub mod adapters;
pub mod credentials;
pub mod error;
pub mod model;
pub mod prelude;
pub mod provider;
pub mod resilience;

pub use credentials::{SecretString, api_key_env_vars, resolve_api_key, resolve_api_key_with};
pub use error::{ProviderError, ProviderErrorKind, classify_status};
pub use model::{ProviderIdentity, ProviderKind, Role, Turn};
pub use provider::{ModelProvider, ProviderFuture};
pub use resilience::{
    NoopOperationHooks, ProviderOperationHooks, RetryPolicy, execute_with_retry,
};

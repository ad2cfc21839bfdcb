//! Common `cprovider` imports for downstream crates.

pub use crate::{
    ModelProvider, NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderIdentity, ProviderKind, ProviderOperationHooks, RetryPolicy, Role, SecretString,
    Turn, execute_with_retry,
};
pub use ccommon::BoxFuture;

use std::future::Future;
use std::pin::Pin;

use crate::{ProviderError, ProviderIdentity, Turn};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A backend that produces one reply from a system instruction and the ordered turns.
///
/// The system instruction travels separately from `turns`; implementations decide how
/// their backend receives it but never fold it into the caller's history.
pub trait ModelProvider: Send + Sync {
    fn identity(&self) -> ProviderIdentity;

    fn generate<'a>(
        &'a self,
        system_instruction: &'a str,
        turns: &'a [Turn],
    ) -> ProviderFuture<'a, Result<String, ProviderError>>;
}

pub(crate) fn ensure_system_instruction(system_instruction: &str) -> Result<(), ProviderError> {
    if system_instruction.trim().is_empty() {
        return Err(ProviderError::invalid_request(
            "system instruction must not be empty",
        ));
    }

    Ok(())
}

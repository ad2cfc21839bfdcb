//! API key handling: redacted secrets and environment lookup per provider kind.

use crate::{ProviderError, ProviderKind};

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Environment variables consulted for `kind`, in priority order.
pub fn api_key_env_vars(kind: ProviderKind) -> &'static [&'static str] {
    match kind {
        ProviderKind::Primary => &[GEMINI_API_KEY_ENV, GOOGLE_API_KEY_ENV],
        ProviderKind::Secondary => &[OPENAI_API_KEY_ENV],
        ProviderKind::Mock => &[],
    }
}

/// Reads the API key for `kind` from the process environment.
pub fn resolve_api_key(kind: ProviderKind) -> Result<SecretString, ProviderError> {
    resolve_api_key_with(kind, |name| std::env::var(name).ok())
}

/// Same as [`resolve_api_key`] with an injectable lookup, so callers can source keys
/// from somewhere other than the process environment.
pub fn resolve_api_key_with(
    kind: ProviderKind,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ProviderError> {
    let names = api_key_env_vars(kind);
    if names.is_empty() {
        return Err(ProviderError::auth_or_config(format!(
            "provider '{kind}' does not use an api key"
        )));
    }

    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(SecretString::new)
        .find(|secret| !secret.is_empty())
        .ok_or_else(|| {
            ProviderError::auth_or_config(format!(
                "missing api key for provider '{kind}': set {}",
                names.join(" or ")
            ))
        })
}

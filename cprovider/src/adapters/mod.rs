//! Backend adapters. Network adapters are feature-gated; the mock is always available.

pub mod mock;

#[cfg(feature = "provider-gemini")]
pub mod gemini;

#[cfg(feature = "provider-openai")]
pub mod openai;

use std::time::Duration;

/// Upper bound on a single backend call made by the HTTP transports.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[cfg(any(feature = "provider-gemini", feature = "provider-openai"))]
mod http {
    use crate::ProviderError;

    pub(crate) fn map_send_error(err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::transport(format!("request timed out: {err}"))
        } else {
            ProviderError::transport(err.to_string())
        }
    }
}

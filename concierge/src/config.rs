//! Application configuration: optional TOML file, then environment, then CLI flags.
//!
//! ```rust
//! use concierge::{AppConfig, ConfigOverrides, ProviderKind};
//!
//! let config = AppConfig::from_toml_str("provider = \"openai\"\nsession_id = \"ops\"")
//!     .expect("valid toml")
//!     .with_overrides(&ConfigOverrides {
//!         mock: true,
//!         ..ConfigOverrides::default()
//!     })
//!     .expect("valid overrides");
//!
//! assert_eq!(config.provider, ProviderKind::Mock);
//! assert_eq!(config.session_id, "ops");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cchat::DEFAULT_SESSION_ID;
use cprovider::{ProviderKind, RetryPolicy};
use serde::Deserialize;

use crate::ConciergeError;

pub const DEFAULT_CONFIG_FILE: &str = "concierge.toml";
pub const DEFAULT_TEMPLATE_ROOT: &str = "prompts";
pub const DEFAULT_HISTORY_ROOT: &str = "data/chat_history";
pub const DEFAULT_LOG_DIR: &str = "data/logs";
pub const DEFAULT_LOCATION: &str = "your private office";

pub const PROVIDER_ENV: &str = "CONCIERGE_PROVIDER";
pub const MODEL_ENV: &str = "CONCIERGE_MODEL";
pub const SESSION_ENV: &str = "CONCIERGE_SESSION";
pub const TEMPLATE_ROOT_ENV: &str = "CONCIERGE_TEMPLATE_ROOT";
pub const HISTORY_ROOT_ENV: &str = "CONCIERGE_HISTORY_ROOT";

/// Backoff settings for network providers, in the units the config file uses.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
            multiplier: policy.backoff_multiplier,
        }
    }
}

impl RetrySettings {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts).with_backoff(
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
            self.multiplier,
        )
    }
}

/// Fully resolved settings for one run of the assistant.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub provider: ProviderKind,
    /// Backend model; `None` keeps the adapter default.
    pub model: Option<String>,
    pub session_id: String,
    pub template_root: PathBuf,
    pub history_root: PathBuf,
    /// Template variant tag; `None` means the provider's model name.
    pub variant_tag: Option<String>,
    /// Few-shot example set under the template root.
    pub examples: Option<String>,
    pub location: String,
    pub log_dir: PathBuf,
    pub retry: RetrySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Primary,
            model: None,
            session_id: DEFAULT_SESSION_ID.to_string(),
            template_root: PathBuf::from(DEFAULT_TEMPLATE_ROOT),
            history_root: PathBuf::from(DEFAULT_HISTORY_ROOT),
            variant_tag: None,
            examples: None,
            location: DEFAULT_LOCATION.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            retry: RetrySettings::default(),
        }
    }
}

/// Command-line values layered over file and environment settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub mock: bool,
    pub provider: Option<String>,
    pub session_id: Option<String>,
    pub model: Option<String>,
}

impl AppConfig {
    /// Loads from the process environment. With no explicit path, `concierge.toml`
    /// is read only when it exists.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConciergeError> {
        Self::load_with(path, overrides, |name| std::env::var(name).ok())
    }

    pub fn load_with(
        path: Option<&Path>,
        overrides: &ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConciergeError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.with_env(env)?.with_overrides(overrides)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConciergeError> {
        let body = fs::read_to_string(path).map_err(|error| {
            ConciergeError::configuration(format!(
                "failed to read config file '{}': {error}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&body).map_err(|error| {
            ConciergeError::configuration(format!("{}: {}", path.display(), error.message))
        })
    }

    pub fn from_toml_str(body: &str) -> Result<Self, ConciergeError> {
        let raw = toml::from_str::<RawConfig>(body).map_err(|error| {
            ConciergeError::configuration(format!("invalid config file: {error}"))
        })?;
        raw.resolve()
    }

    pub fn with_env(
        mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConciergeError> {
        if let Some(provider) = non_blank(env(PROVIDER_ENV)) {
            self.provider = parse_provider(&provider, PROVIDER_ENV)?;
        }
        if let Some(model) = non_blank(env(MODEL_ENV)) {
            self.model = Some(model);
        }
        if let Some(session_id) = non_blank(env(SESSION_ENV)) {
            self.session_id = session_id;
        }
        if let Some(root) = non_blank(env(TEMPLATE_ROOT_ENV)) {
            self.template_root = PathBuf::from(root);
        }
        if let Some(root) = non_blank(env(HISTORY_ROOT_ENV)) {
            self.history_root = PathBuf::from(root);
        }
        Ok(self)
    }

    /// `mock` wins over `provider` when both are given.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConciergeError> {
        if let Some(provider) = non_blank(overrides.provider.clone()) {
            self.provider = parse_provider(&provider, "--provider")?;
        }
        if overrides.mock {
            self.provider = ProviderKind::Mock;
        }
        if let Some(session_id) = non_blank(overrides.session_id.clone()) {
            self.session_id = session_id;
        }
        if let Some(model) = non_blank(overrides.model.clone()) {
            self.model = Some(model);
        }
        Ok(self)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.to_policy()
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("concierge.log")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    provider: Option<String>,
    model: Option<String>,
    session_id: Option<String>,
    template_root: Option<String>,
    history_root: Option<String>,
    variant_tag: Option<String>,
    examples: Option<String>,
    location: Option<String>,
    log_dir: Option<String>,
    #[serde(default)]
    retry: RawRetry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRetry {
    max_attempts: Option<u32>,
    initial_backoff_ms: Option<u64>,
    max_backoff_ms: Option<u64>,
    multiplier: Option<f64>,
}

impl RawConfig {
    fn resolve(self) -> Result<AppConfig, ConciergeError> {
        let defaults = AppConfig::default();
        let provider = match non_blank(self.provider) {
            Some(provider) => parse_provider(&provider, "provider")?,
            None => defaults.provider,
        };

        if self.retry.max_attempts == Some(0) {
            return Err(ConciergeError::configuration(
                "retry.max_attempts must be at least 1",
            ));
        }
        if let Some(multiplier) = self.retry.multiplier {
            if !multiplier.is_finite() || multiplier < 1.0 {
                return Err(ConciergeError::configuration(format!(
                    "retry.multiplier must be a finite number >= 1, got {multiplier}"
                )));
            }
        }

        let retry = RetrySettings {
            max_attempts: self.retry.max_attempts.unwrap_or(defaults.retry.max_attempts),
            initial_backoff_ms: self
                .retry
                .initial_backoff_ms
                .unwrap_or(defaults.retry.initial_backoff_ms),
            max_backoff_ms: self
                .retry
                .max_backoff_ms
                .unwrap_or(defaults.retry.max_backoff_ms),
            multiplier: self.retry.multiplier.unwrap_or(defaults.retry.multiplier),
        };

        Ok(AppConfig {
            provider,
            model: non_blank(self.model),
            session_id: non_blank(self.session_id).unwrap_or(defaults.session_id),
            template_root: non_blank(self.template_root)
                .map(PathBuf::from)
                .unwrap_or(defaults.template_root),
            history_root: non_blank(self.history_root)
                .map(PathBuf::from)
                .unwrap_or(defaults.history_root),
            variant_tag: non_blank(self.variant_tag),
            examples: non_blank(self.examples),
            location: non_blank(self.location).unwrap_or(defaults.location),
            log_dir: non_blank(self.log_dir)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            retry,
        })
    }
}

fn parse_provider(value: &str, source: &str) -> Result<ProviderKind, ConciergeError> {
    ProviderKind::parse(value).ok_or_else(|| {
        ConciergeError::configuration(format!(
            "{source}: unknown provider '{value}' (expected primary, secondary or mock)"
        ))
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

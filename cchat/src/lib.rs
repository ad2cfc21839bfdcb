//! Conversational orchestration over model providers, prompt templates and session history.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cchat::Orchestrator;
//! use cmemory::FilesystemSessionStore;
//! use cprompt::TemplateStore;
//! use cprovider::adapters::mock::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut orchestrator = Orchestrator::builder(
//!     Arc::new(MockProvider::new()),
//!     TemplateStore::new("prompts")?,
//!     Arc::new(FilesystemSessionStore::new("data/chat_history")?),
//! )
//! .session_id("boss_session_01")
//! .build()
//! .await?;
//!
//! println!("{}", orchestrator.handle("status report").await);
//! # Ok(())
//! # }
//! ```

mod error;
mod hooks;
mod orchestrator;
mod types;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, DEFAULT_PERSISTENCE_ALERT_THRESHOLD, DEFAULT_SESSION_ID,
        ExchangeObserver, ExchangeOutcome, ExchangeStatus, NoopExchangeObserver, Orchestrator,
        OrchestratorBuilder, Persona,
    };
    pub use ccommon::SessionId;
}

pub use error::{ChatError, ChatErrorKind};
pub use hooks::{ExchangeObserver, NoopExchangeObserver};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use types::{
    DEFAULT_PERSISTENCE_ALERT_THRESHOLD, DEFAULT_SESSION_ID, ExchangeOutcome, ExchangeStatus,
    Persona,
};

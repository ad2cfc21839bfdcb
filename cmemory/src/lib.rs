//! Per-session conversation history persistence.
//!
//! ```rust
//! use ccommon::SessionId;
//! use cmemory::{InMemorySessionStore, SessionStore};
//! use cprovider::Turn;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = InMemorySessionStore::new();
//! let session = SessionId::from("boss_session_01");
//! assert!(store.load(&session).await.expect("load").is_empty());
//!
//! store
//!     .save(&session, &[Turn::user("hi"), Turn::model("hello boss")])
//!     .await
//!     .expect("save");
//! assert_eq!(store.load(&session).await.expect("load").len(), 2);
//! # }
//! ```

mod backend;
mod backends;
mod error;

pub mod prelude {
    pub use crate::{
        FilesystemSessionStore, InMemorySessionStore, SessionStore, SessionStoreError,
        SessionStoreErrorKind,
    };
}

pub use backend::{InMemorySessionStore, SessionStore};
pub use backends::filesystem::{FilesystemSessionStore, session_file_name};
pub use error::{SessionStoreError, SessionStoreErrorKind};

//! Shared primitives for the concierge workspace crates.
//!
//! ```rust
//! use ccommon::SessionId;
//!
//! let session = SessionId::from("boss_session_01");
//! assert_eq!(session.as_str(), "boss_session_01");
//! assert_eq!(session.to_string(), "boss_session_01");
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use ccommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Session identifier newtype shared by the store and the orchestrator.

    use std::fmt::{Display, Formatter};

    /// Opaque, caller-supplied conversation identifier.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }

        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    impl AsRef<str> for SessionId {
        fn as_ref(&self) -> &str {
            self.as_str()
        }
    }
}

pub use context::SessionId;
pub use future::BoxFuture;

#[cfg(test)]
mod tests {
    use super::SessionId;

    #[test]
    fn session_id_round_trips_strings() {
        let owned = SessionId::new(String::from("session-1"));
        let borrowed = SessionId::from("session-1");

        assert_eq!(owned, borrowed);
        assert_eq!(owned.as_str(), "session-1");
        assert_eq!(borrowed.to_string(), "session-1");
        assert!(!owned.is_empty());
    }

    #[test]
    fn empty_session_id_is_representable() {
        let empty = SessionId::from("");
        assert!(empty.is_empty());
        assert_eq!(empty.as_ref(), "");
    }
}

//! Session store trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use ccommon::{BoxFuture, SessionId};
use cprovider::Turn;

use crate::error::SessionStoreError;

/// Durable home of each session's turn sequence.
///
/// `load` of an unknown id yields an empty history. `save` replaces the whole record.
pub trait SessionStore: Send + Sync {
    fn load<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<Turn>, SessionStoreError>>;

    fn save<'a>(
        &'a self,
        session_id: &'a SessionId,
        turns: &'a [Turn],
    ) -> BoxFuture<'a, Result<(), SessionStoreError>>;
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, Vec<Turn>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }
}

impl SessionStore for InMemorySessionStore {
    fn load<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<Turn>, SessionStoreError>> {
        Box::pin(async move {
            let sessions = self
                .sessions
                .lock()
                .map_err(|_| SessionStoreError::storage("in-memory store lock poisoned"))?;
            Ok(sessions.get(session_id).cloned().unwrap_or_default())
        })
    }

    fn save<'a>(
        &'a self,
        session_id: &'a SessionId,
        turns: &'a [Turn],
    ) -> BoxFuture<'a, Result<(), SessionStoreError>> {
        Box::pin(async move {
            let mut sessions = self
                .sessions
                .lock()
                .map_err(|_| SessionStoreError::storage("in-memory store lock poisoned"))?;
            sessions.insert(session_id.clone(), turns.to_vec());
            Ok(())
        })
    }
}

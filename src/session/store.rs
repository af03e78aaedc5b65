//! Process-local session store
//!
//! Holds every live session, keyed by session id. Each session sits behind
//! its own `tokio::sync::Mutex`, which gives the per-session serialization
//! discipline the provisioner and controller rely on: concurrent provision
//! calls collapse to one remote call, concurrent submits keep transcript
//! ordinals in order, and sessions never share state.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::session::{Session, SessionId};

/// Shared handle to one session
pub type SharedSession = Arc<Mutex<Session>>;

/// Process-local store of live sessions
///
/// Cloning the store is cheap and shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SharedSession>>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `id`, creating an empty one on first access
    ///
    /// Idempotent within a session's lifetime: repeated calls with the same
    /// id return the same shared session.
    pub async fn get_or_create(&self, id: &SessionId) -> SharedSession {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(id) {
                return Arc::clone(session);
            }
        }

        let mut sessions = self.sessions.write().await;
        // Re-check under the write lock in case another task created it
        Arc::clone(
            sessions
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(Session::new(id.clone())))),
        )
    }

    /// Look up an existing session without creating one
    pub async fn get(&self, id: &SessionId) -> Option<SharedSession> {
        self.sessions.read().await.get(id).map(Arc::clone)
    }

    /// Drop a session when its interaction ends
    pub async fn remove(&self, id: &SessionId) -> Option<SharedSession> {
        tracing::info!("Removing session {}", id);
        self.sessions.write().await.remove(id)
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store has no live sessions
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Speaker;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = SessionStore::new();
        let id = SessionId::from("session-a");

        let first = store.get_or_create(&id).await;
        let second = store.get_or_create(&id).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();

        let a = store.get_or_create(&SessionId::from("session-a")).await;
        let b = store.get_or_create(&SessionId::from("session-b")).await;

        a.lock().await.append_turn(Speaker::User, "wrench");

        assert_eq!(a.lock().await.transcript().len(), 1);
        assert!(b.lock().await.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_remove_drops_session() {
        let store = SessionStore::new();
        let id = SessionId::from("session-a");

        store.get_or_create(&id).await;
        assert!(store.get(&id).await.is_some());

        store.remove(&id).await;
        assert!(store.get(&id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_get_or_create_yields_one_session() {
        let store = SessionStore::new();
        let id = SessionId::from("session-a");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let id = id.clone();
            handles.push(tokio::spawn(
                async move { store.get_or_create(&id).await },
            ));
        }

        let mut sessions = Vec::new();
        for handle in handles {
            sessions.push(handle.await.unwrap());
        }

        assert_eq!(store.len().await, 1);
        for session in &sessions[1..] {
            assert!(Arc::ptr_eq(&sessions[0], session));
        }
    }
}

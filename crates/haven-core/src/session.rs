//! In-memory session store: session id -> conversation history + cached emotion label.
//!
//! Sessions live for the process lifetime. Each session sits behind its own
//! `tokio::sync::Mutex`, so concurrent turns on one session id are serialized while
//! distinct sessions proceed in parallel.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Append-only, arrival order.
    pub history: Vec<Turn>,
    /// Set by the first classification (or `/classify`) and reused afterwards.
    pub emotion: Option<String>,
}

impl Session {
    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(Turn {
            role,
            content: content.into(),
            at: Utc::now(),
        });
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Process-wide session map. Construct once at startup and share via `Arc`.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionHandle>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `session_id`, creating an empty session on first reference.
    /// The map shard lock is released before this returns.
    fn handle(&self, session_id: &str) -> SessionHandle {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(target: "haven::session", session_id, "new session");
                Arc::new(Mutex::new(Session::default()))
            })
            .clone()
    }

    /// Snapshot of the session (empty, with no emotion, on first access).
    pub async fn get_or_create(&self, session_id: &str) -> Session {
        let handle = self.handle(session_id);
        let session = handle.lock().await;
        session.clone()
    }

    /// Overwrites the cached emotion label.
    pub async fn set_emotion(&self, session_id: &str, label: impl Into<String>) {
        let handle = self.handle(session_id);
        handle.lock().await.emotion = Some(label.into());
    }

    pub async fn get_emotion(&self, session_id: &str) -> Option<String> {
        let handle = self.handle(session_id);
        let session = handle.lock().await;
        session.emotion.clone()
    }

    pub async fn append_turn(&self, session_id: &str, role: Role, text: impl Into<String>) {
        let handle = self.handle(session_id);
        handle.lock().await.push(role, text);
    }

    /// Exclusive access to a session for the duration of a chat turn.
    pub async fn lock(&self, session_id: &str) -> OwnedMutexGuard<Session> {
        self.handle(session_id).lock_owned().await
    }

    /// Number of sessions seen since startup.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_access_creates_empty_session() {
        let store = SessionStore::new();
        assert!(store.is_empty());
        let session = store.get_or_create("abc1").await;
        assert!(session.history.is_empty());
        assert!(session.emotion.is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_emotion("other").await, None);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn emotion_is_last_write_wins() {
        let store = SessionStore::new();
        store.set_emotion("s1", "joy").await;
        assert_eq!(store.get_emotion("s1").await.as_deref(), Some("joy"));
        store.set_emotion("s1", "fear").await;
        assert_eq!(store.get_emotion("s1").await.as_deref(), Some("fear"));
    }

    #[tokio::test]
    async fn turns_keep_arrival_order() {
        let store = SessionStore::new();
        store.append_turn("s1", Role::User, "hello").await;
        store.append_turn("s1", Role::Assistant, "hi there").await;
        store.append_turn("s2", Role::User, "unrelated").await;

        let s1 = store.get_or_create("s1").await;
        let roles: Vec<Role> = s1.history.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(s1.history[1].content, "hi there");
        assert!(s1.history[0].at <= s1.history[1].at);
        assert_eq!(store.get_or_create("s2").await.history.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_locks_on_one_session_do_not_lose_turns() {
        let store = Arc::new(SessionStore::new());
        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                let mut session = store.lock("shared").await;
                session.push(Role::User, format!("msg {}", i));
                tokio::task::yield_now().await;
                session.push(Role::Assistant, format!("reply {}", i));
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }
        let session = store.get_or_create("shared").await;
        assert_eq!(session.history.len(), 32);
        // each user turn is immediately followed by its own reply
        for pair in session.history.chunks(2) {
            let n = pair[0].content.trim_start_matches("msg ");
            assert_eq!(pair[1].content, format!("reply {}", n));
        }
    }
}

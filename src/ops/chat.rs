use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, NaiveDateTime};

use crate::ops::backend::{BackendError, TextBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// One caller's conversation so far
#[derive(Debug, Clone)]
pub struct Conversation {
    pub turns: Vec<Turn>,
    pub last_active: NaiveDateTime,
}

impl Conversation {
    fn new(now: NaiveDateTime) -> Self {
        Conversation {
            turns: Vec::new(),
            last_active: now,
        }
    }

    /// Transcript sent to the backend, ending with an open assistant line
    fn prompt(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            out.push_str(turn.role.label());
            out.push_str(": ");
            out.push_str(&turn.text);
            out.push('\n');
        }
        out.push_str("Assistant:");
        out
    }
}

pub type SessionHandle = Arc<Mutex<Conversation>>;

/// Conversations keyed by a caller-supplied session key. A session is created
/// on first use and lives until removed or evicted explicitly.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

static GLOBAL: LazyLock<SessionRegistry> = LazyLock::new(SessionRegistry::default);

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static SessionRegistry {
        &GLOBAL
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_or_create(&self, key: &str, now: NaiveDateTime) -> SessionHandle {
        self.map()
            .entry(key.to_string())
            .or_insert_with(|| {
                log::debug!("new chat session {}", key);
                Arc::new(Mutex::new(Conversation::new(now)))
            })
            .clone()
    }

    pub fn get(&self, key: &str) -> Option<SessionHandle> {
        self.map().get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> bool {
        self.map().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    /// Drop sessions idle for longer than `max_idle`. Returns how many went.
    pub fn evict_idle(&self, max_idle: Duration, now: NaiveDateTime) -> usize {
        let mut map = self.map();
        let before = map.len();
        map.retain(|_, handle| {
            let conv = handle.lock().unwrap_or_else(PoisonError::into_inner);
            now - conv.last_active <= max_idle
        });
        before - map.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("please type a message")]
    EmptyMessage,
    #[error("AI error: {0}")]
    Backend(#[from] BackendError),
}

/// Send `message` in session `key` and return the reply. The whole transcript
/// goes to the backend. On failure the user turn stays recorded without a reply.
pub fn chat_reply(
    registry: &SessionRegistry,
    backend: &dyn TextBackend,
    key: &str,
    message: &str,
    now: NaiveDateTime,
) -> Result<String, ChatError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    let handle = registry.get_or_create(key, now);
    let mut conv = handle.lock().unwrap_or_else(PoisonError::into_inner);
    conv.last_active = now;
    conv.turns.push(Turn {
        role: Role::User,
        text: message.to_string(),
    });

    let reply = backend.complete(&conv.prompt())?.trim().to_string();
    conv.turns.push(Turn {
        role: Role::Assistant,
        text: reply.clone(),
    });
    Ok(reply)
}

//! Per-user conversation state, kept in memory only.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::assistant::catalog::{Language, Topic};

/// Where a user is in the menu tree. Each state carries what it needs, so a
/// language is always known past the language prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    AwaitingLanguage,
    MainMenu { language: Language },
    TopicDetail { language: Language, topic: Topic },
}

#[derive(Debug, Clone)]
pub struct Session {
    state: DialogueState,
    last_active: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    fn started_at(now: DateTime<Utc>) -> Self {
        Self {
            state: DialogueState::AwaitingLanguage,
            last_active: now,
        }
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn set_state(&mut self, state: DialogueState) {
        self.state = state;
    }

    pub fn language(&self) -> Option<Language> {
        match self.state {
            DialogueState::AwaitingLanguage => None,
            DialogueState::MainMenu { language } | DialogueState::TopicDetail { language, .. } => Some(language),
        }
    }

    pub fn current_topic(&self) -> Option<Topic> {
        match self.state {
            DialogueState::TopicDetail { topic, .. } => Some(topic),
            _ => None,
        }
    }

    /// Forget language and topic, back to the language prompt.
    pub fn reset(&mut self) {
        self.state = DialogueState::AwaitingLanguage;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active = now;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Sessions keyed by Telegram user id.
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start (or restart) a conversation for `user_id`.
    pub async fn begin(&self, user_id: i64) {
        self.sessions.lock().await.insert(user_id, Session::new());
    }

    /// Run `f` on the user's session. Returns `None` when the user has no
    /// active conversation.
    pub async fn with_session<R>(&self, user_id: i64, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&user_id)?;
        session.touch(Utc::now());
        Some(f(session))
    }

    pub async fn end(&self, user_id: i64) -> Option<Session> {
        self.sessions.lock().await.remove(&user_id)
    }

    /// Drop sessions idle for longer than `max_idle`. Returns how many went.
    pub async fn prune_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_active <= max_idle);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

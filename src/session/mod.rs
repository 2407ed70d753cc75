use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

/// Server-side map from an opaque token (carried in the session cookie) to
/// the logged-in username.
pub trait SessionStore: Send + Sync {
    /// Issues a fresh token for `username`.
    fn create(&self, username: &str) -> String;

    fn get(&self, token: &str) -> Option<String>;

    /// Idempotent: destroying an unknown token is not an error.
    fn destroy(&self, token: &str);
}

#[derive(Default)]
pub struct MemorySessions {
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionStore for MemorySessions {
    fn create(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .unwrap()
            .insert(token.clone(), username.to_string());
        token
    }

    fn get(&self, token: &str) -> Option<String> {
        self.sessions.read().unwrap().get(token).cloned()
    }

    fn destroy(&self, token: &str) {
        self.sessions.write().unwrap().remove(token);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Todo;

/// The whole persisted dataset. One of these is read from disk at the start
/// of every request and written back in full by mutating handlers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::Database;

/// Access to the persisted dataset. Handlers do load → mutate → save with no
/// cross-request locking, so overlapping writers can lose updates (last
/// writer wins).
#[async_trait]
pub trait Store: Send + Sync {
    async fn load(&self) -> Result<Database, AppError>;
    async fn save(&self, db: &Database) -> Result<(), AppError>;
}

/// Production store: one JSON document on disk, rewritten in full on every
/// save.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load(&self) -> Result<Database, AppError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("no database file at {}, starting empty", self.path.display());
                return Ok(Database::default());
            }
            Err(e) => return Err(e.into()),
        };

        let db = serde_json::from_str(&data)?;
        Ok(db)
    }

    async fn save(&self, db: &Database) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(db)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store, used as the test double for `JsonFileStore`.
#[derive(Default)]
pub struct MemoryStore {
    db: Mutex<Database>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> Result<Database, AppError> {
        Ok(self.db.lock().unwrap().clone())
    }

    async fn save(&self, db: &Database) -> Result<(), AppError> {
        *self.db.lock().unwrap() = db.clone();
        Ok(())
    }
}

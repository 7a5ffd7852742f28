//! Key-value persistence for chores, team members and categories.
//!
//! Each collection is one JSON document under a fixed key. Reads are
//! forgiving: a missing or corrupt document reads as empty (or as the
//! default categories) instead of failing.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

use super::data_dir;
use crate::chore::{default_categories, Category, Chore, TeamMember};
use crate::error::{Result, StorageError, ValidationError};

pub const CHORES_KEY: &str = "office-chores-data";
pub const TEAM_KEY: &str = "office-chores-team";
pub const CATEGORIES_KEY: &str = "office-chores-categories";

/// A string get/set store.
pub trait KeyValueStore {
    /// # Errors
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// SQLite `kv` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at `<data dir>/office-chores.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?.join("office-chores.db"))
    }

    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Chore, team and category collections on top of a [`KeyValueStore`].
pub struct ChoreStore<S: KeyValueStore> {
    kv: S,
}

impl ChoreStore<SqliteStore> {
    /// Open the default on-disk store.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open() -> Result<Self> {
        Ok(Self::new(SqliteStore::open()?))
    }
}

impl<S: KeyValueStore> ChoreStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(%key, error = %e, "ignoring unreadable stored value");
                Ok(None)
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.kv.set(key, &raw)?;
        tracing::debug!(%key, bytes = raw.len(), "stored collection");
        Ok(())
    }

    // === Chores ===

    /// # Errors
    /// Returns an error if the backend cannot be read.
    pub fn chores(&self) -> Result<Vec<Chore>> {
        Ok(self.read(CHORES_KEY)?.unwrap_or_default())
    }

    /// # Errors
    /// Returns an error if the backend cannot be written.
    pub fn save_chores(&self, chores: &[Chore]) -> Result<()> {
        self.write(CHORES_KEY, chores)
    }

    /// # Errors
    /// Returns an error if the backend cannot be read.
    pub fn get_chore(&self, id: &str) -> Result<Option<Chore>> {
        Ok(self.chores()?.into_iter().find(|c| c.id == id))
    }

    /// Store `chore` under a fresh id and return the stored copy.
    ///
    /// # Errors
    /// Returns an error if the title is blank or the backend fails.
    pub fn add_chore(&self, mut chore: Chore) -> Result<Chore> {
        chore.title = chore.title.trim().to_string();
        if chore.title.is_empty() {
            return Err(ValidationError::Empty("title").into());
        }
        chore.id = Uuid::new_v4().to_string();
        let mut chores = self.chores()?;
        chores.push(chore.clone());
        self.save_chores(&chores)?;
        tracing::info!(chore_id = %chore.id, title = %chore.title, "chore added");
        Ok(chore)
    }

    /// Replace the stored chore with the same id.
    ///
    /// # Errors
    /// Returns an error if no chore has that id or the backend fails.
    pub fn update_chore(&self, chore: &Chore) -> Result<()> {
        if chore.title.trim().is_empty() {
            return Err(ValidationError::Empty("title").into());
        }
        let mut chores = self.chores()?;
        let slot = chores
            .iter_mut()
            .find(|c| c.id == chore.id)
            .ok_or_else(|| StorageError::NotFound {
                kind: "Chore",
                id: chore.id.clone(),
            })?;
        *slot = chore.clone();
        self.save_chores(&chores)?;
        tracing::info!(chore_id = %chore.id, "chore updated");
        Ok(())
    }

    /// Mark a chore done or open again.
    ///
    /// # Errors
    /// Returns an error if no chore has that id or the backend fails.
    pub fn set_completed(&self, id: &str, completed: bool) -> Result<Chore> {
        let mut chore = self.get_chore(id)?.ok_or_else(|| StorageError::NotFound {
            kind: "Chore",
            id: id.to_string(),
        })?;
        chore.completed = completed;
        self.update_chore(&chore)?;
        Ok(chore)
    }

    /// Returns whether a chore was removed.
    ///
    /// # Errors
    /// Returns an error if the backend fails.
    pub fn delete_chore(&self, id: &str) -> Result<bool> {
        let mut chores = self.chores()?;
        let before = chores.len();
        chores.retain(|c| c.id != id);
        if chores.len() == before {
            return Ok(false);
        }
        self.save_chores(&chores)?;
        tracing::info!(chore_id = %id, "chore deleted");
        Ok(true)
    }

    // === Team ===

    /// # Errors
    /// Returns an error if the backend cannot be read.
    pub fn team_members(&self) -> Result<Vec<TeamMember>> {
        Ok(self.read(TEAM_KEY)?.unwrap_or_default())
    }

    /// # Errors
    /// Returns an error if the backend cannot be written.
    pub fn save_team_members(&self, members: &[TeamMember]) -> Result<()> {
        self.write(TEAM_KEY, members)
    }

    /// # Errors
    /// Returns an error if the name is blank or the backend fails.
    pub fn add_team_member(&self, name: &str) -> Result<TeamMember> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty("name").into());
        }
        let member = TeamMember::new(name);
        let mut members = self.team_members()?;
        members.push(member.clone());
        self.save_team_members(&members)?;
        Ok(member)
    }

    /// Returns whether a member was removed.
    ///
    /// # Errors
    /// Returns an error if the backend fails.
    pub fn remove_team_member(&self, id: &str) -> Result<bool> {
        let mut members = self.team_members()?;
        let before = members.len();
        members.retain(|m| m.id != id);
        if members.len() == before {
            return Ok(false);
        }
        self.save_team_members(&members)?;
        Ok(true)
    }

    // === Categories ===

    /// Stored categories, or the defaults if none were saved.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    pub fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.read(CATEGORIES_KEY)?.unwrap_or_else(default_categories))
    }

    /// # Errors
    /// Returns an error if the backend cannot be written.
    pub fn save_categories(&self, categories: &[Category]) -> Result<()> {
        self.write(CATEGORIES_KEY, categories)
    }
}

use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;

/// Key the whole board snapshot lives under.
pub const STORAGE_KEY: &str = "neon-quest-board";

/// Local key-value storage. The board writes one JSON blob under
/// [`STORAGE_KEY`] and never merges.
pub trait Storage {
    fn get_item(&self, key: &str) -> crate::error::Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> crate::error::Result<()>;
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }
}

impl Storage for Database {
    fn get_item(&self, key: &str) -> crate::error::Result<Option<String>> {
        Ok(self.get(key)?)
    }

    fn set_item(&mut self, key: &str, value: &str) -> crate::error::Result<()> {
        Ok(self.set(key, value)?)
    }
}

/// HashMap-backed storage that counts writes.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pub items: std::collections::HashMap<String, String>,
    pub writes: usize,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.items.insert(key.to_string(), value.to_string());
        storage
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> crate::error::Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> crate::error::Result<()> {
        self.writes += 1;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

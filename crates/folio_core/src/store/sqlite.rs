//! SQLite-backed store over the `kv_entries` table.
//!
//! # Invariants
//! - The connection was produced by `db::open_db*`, so the table exists.
//! - `set` is a single upsert statement; a key never holds a partial value.

use crate::store::{check_key, Store, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl Store for SqliteStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        check_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        check_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        check_key(key)?;
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        check_key(key)?;
        let present = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM kv_entries WHERE key = ?1);",
            [key],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(present)
    }
}

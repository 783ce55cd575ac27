//! SQLite-backed persistence.
//!
//! Provides:
//! - A key-value store holding the live session records (wizard
//!   position, answers, respondent, last result)
//! - A `submissions` history table, one row per completed assessment

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::catalog::Archetype;

use super::data_dir;

/// One completed assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: i64,
    pub respondent_name: String,
    pub respondent_email: String,
    pub predominant: String,
    pub computed_at: DateTime<Utc>,
}

/// SQLite database for session state and submission history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/arquetipo/arquetipo.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("arquetipo.db");
        Self::open_at(&path)
    }

    /// Open a database at an explicit path (tests use a temp dir).
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS submissions (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                respondent_name  TEXT NOT NULL,
                respondent_email TEXT NOT NULL,
                predominant      TEXT NOT NULL,
                computed_at      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_submissions_computed_at
                ON submissions(computed_at);",
        )?;
        Ok(())
    }

    /// Record a completed assessment.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_submission(
        &self,
        respondent_name: &str,
        respondent_email: &str,
        predominant: Archetype,
        computed_at: DateTime<Utc>,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO submissions (respondent_name, respondent_email, predominant, computed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                respondent_name,
                respondent_email,
                predominant.as_str(),
                computed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent submissions, newest first.
    pub fn submissions(&self, limit: u32) -> Result<Vec<SubmissionRecord>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, respondent_name, respondent_email, predominant, computed_at
             FROM submissions ORDER BY computed_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(SubmissionRecord {
                id: row.get(0)?,
                respondent_name: row.get(1)?,
                respondent_email: row.get(2)?,
                predominant: row.get(3)?,
                computed_at: row
                    .get::<_, String>(4)?
                    .parse::<DateTime<Utc>>()
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;
        rows.collect()
    }

    // ── Key-value store ──────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

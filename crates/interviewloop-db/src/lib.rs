//! Database layer for interviewloop.
//!
//! A `Database` owns the SQLite connection and hands out short-lived
//! stores for interviews and coin wallets.

mod interviews;
mod wallets;

pub use interviews::{InterviewFilter, InterviewRecord, Interviews};
pub use wallets::Wallets;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create the database at `~/.local/share/interviewloop/interviewloop.db`.
    pub fn open() -> Result<Self, rusqlite::Error> {
        let db_path = Self::default_path();

        if let Some(parent) = db_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(error = %e, path = %parent.display(), "Could not create data directory");
            }
        }

        Self::open_at(&db_path)
    }

    pub fn open_at(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("interviewloop")
            .join("interviewloop.db")
    }

    pub fn interviews(&self) -> Interviews<'_> {
        Interviews::new(self.lock())
    }

    pub fn wallets(&self) -> Wallets<'_> {
        Wallets::new(self.lock())
    }

    // A panic while holding the lock cannot leave a half-applied statement
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS interviews (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                domain TEXT NOT NULL,
                level TEXT NOT NULL,
                status TEXT NOT NULL,
                authenticity_score INTEGER,
                technical_accuracy REAL,
                classification TEXT,
                coins_awarded INTEGER,
                transcript TEXT NOT NULL,
                started_at TEXT NOT NULL,
                ended_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_interviews_pool ON interviews(domain, level);
            CREATE INDEX IF NOT EXISTS idx_interviews_started_at ON interviews(started_at DESC);

            CREATE TABLE IF NOT EXISTS wallets (
                user_id TEXT PRIMARY KEY,
                coins INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL
            );
            "#,
        )
    }
}

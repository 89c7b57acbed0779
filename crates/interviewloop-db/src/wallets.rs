//! Coin wallets, one per user.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::MutexGuard;

pub struct Wallets<'db> {
    conn: MutexGuard<'db, Connection>,
}

impl<'db> Wallets<'db> {
    pub(crate) fn new(conn: MutexGuard<'db, Connection>) -> Self {
        Self { conn }
    }

    /// Create an empty wallet unless the user already has one.
    pub fn init(&self, user_id: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR IGNORE INTO wallets (user_id, coins, updated_at) VALUES (?1, 0, ?2)",
            params![user_id, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Credit coins, creating the wallet if needed. Returns the new balance.
    pub fn add(&self, user_id: &str, coins: i64) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            r#"
            INSERT INTO wallets (user_id, coins, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                coins = coins + excluded.coins,
                updated_at = excluded.updated_at
            "#,
            params![user_id, coins, Utc::now().to_rfc3339()],
        )?;

        Ok(self.balance(user_id)?.unwrap_or(0))
    }

    /// `None` when the user has no wallet yet.
    pub fn balance(&self, user_id: &str) -> Result<Option<i64>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT coins FROM wallets WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()
    }
}

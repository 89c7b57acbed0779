//! Interview records: one row per session, rewritten as the session advances.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::MutexGuard;

/// A stored interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: String,
    pub user_id: String,
    pub domain: String,
    pub level: String,
    pub status: String,
    pub authenticity_score: Option<u32>,
    pub technical_accuracy: Option<f64>,
    pub classification: Option<String>,
    pub coins_awarded: Option<i64>,
    pub transcript: String, // JSON session snapshot
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Filter options for listing interviews.
#[derive(Debug, Default, Clone)]
pub struct InterviewFilter {
    pub user_id: Option<String>,
    pub domain: Option<String>,
    pub level: Option<String>,
    pub limit: Option<usize>,
}

/// Interviews store with a borrowed connection.
pub struct Interviews<'db> {
    conn: MutexGuard<'db, Connection>,
}

const COLUMNS: &str = "id, user_id, domain, level, status, authenticity_score, technical_accuracy, classification, coins_awarded, transcript, started_at, ended_at";

impl<'db> Interviews<'db> {
    pub(crate) fn new(conn: MutexGuard<'db, Connection>) -> Self {
        Self { conn }
    }

    /// Insert or update an interview record.
    pub fn save(&self, record: &InterviewRecord) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            r#"
            INSERT INTO interviews (id, user_id, domain, level, status, authenticity_score, technical_accuracy, classification, coins_awarded, transcript, started_at, ended_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                authenticity_score = excluded.authenticity_score,
                technical_accuracy = excluded.technical_accuracy,
                classification = excluded.classification,
                coins_awarded = excluded.coins_awarded,
                transcript = excluded.transcript,
                ended_at = excluded.ended_at
            "#,
            params![
                record.id,
                record.user_id,
                record.domain,
                record.level,
                record.status,
                record.authenticity_score,
                record.technical_accuracy,
                record.classification,
                record.coins_awarded,
                record.transcript,
                record.started_at.to_rfc3339(),
                record.ended_at.map(|t| t.to_rfc3339()),
            ],
        )?;

        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<InterviewRecord>, rusqlite::Error> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM interviews WHERE id = ?1", COLUMNS),
                params![id],
                Self::row_to_record,
            )
            .optional()
    }

    /// Most recent first.
    pub fn list(&self, filter: &InterviewFilter) -> Result<Vec<InterviewRecord>, rusqlite::Error> {
        let mut sql = format!("SELECT {} FROM interviews WHERE 1=1", COLUMNS);
        let mut param_values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref user_id) = filter.user_id {
            sql.push_str(" AND user_id = ?");
            param_values.push(Box::new(user_id.clone()));
        }

        if let Some(ref domain) = filter.domain {
            sql.push_str(" AND domain = ?");
            param_values.push(Box::new(domain.clone()));
        }

        if let Some(ref level) = filter.level {
            sql.push_str(" AND level = ?");
            param_values.push(Box::new(level.clone()));
        }

        sql.push_str(" ORDER BY started_at DESC");

        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let params: Vec<&dyn rusqlite::ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params.as_slice(), Self::row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }

    fn row_to_record(row: &rusqlite::Row) -> Result<InterviewRecord, rusqlite::Error> {
        let started_at_str: String = row.get(10)?;
        let ended_at_str: Option<String> = row.get(11)?;

        Ok(InterviewRecord {
            id: row.get(0)?,
            user_id: row.get(1)?,
            domain: row.get(2)?,
            level: row.get(3)?,
            status: row.get(4)?,
            authenticity_score: row.get(5)?,
            technical_accuracy: row.get(6)?,
            classification: row.get(7)?,
            coins_awarded: row.get(8)?,
            transcript: row.get(9)?,
            started_at: parse_timestamp(&started_at_str).unwrap_or_else(Utc::now),
            ended_at: ended_at_str.as_deref().and_then(parse_timestamp),
        })
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

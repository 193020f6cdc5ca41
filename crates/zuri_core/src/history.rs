//! Command history persistence.
//!
//! Best-effort SQLite log of {command text, classified intent} per
//! processed command. Failures here are the one error category that is
//! downgraded: the dispatcher logs them and the command's own result is
//! unaffected.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::config::ZuriConfig;
use crate::intent::Intent;

/// One logged command.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: i64,
    pub raw_text: String,
    pub intent: String,
    pub created_at: DateTime<Utc>,
}

pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open the database at the default data-dir location, creating
    /// parent directories as needed.
    pub fn open_default() -> Result<Self> {
        let path = ZuriConfig::default_history_db()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::open_at(path)
    }

    /// Open at an explicit path (CLI override, tests).
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path_ref)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS command_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                raw_text TEXT NOT NULL,
                intent TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_history_created
                ON command_history(created_at);
            ",
        )?;
        Ok(())
    }

    /// Append one processed command.
    pub fn record(&self, raw_text: &str, intent: Intent) -> Result<()> {
        self.conn.execute(
            "INSERT INTO command_history (raw_text, intent, created_at) VALUES (?1, ?2, ?3)",
            params![raw_text, intent.to_string(), Utc::now()],
        )?;
        Ok(())
    }

    /// Most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, raw_text, intent, created_at
             FROM command_history
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                raw_text: row.get(1)?,
                intent: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Total number of logged commands.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM command_history", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, HistoryDb) {
        let tmp = TempDir::new().unwrap();
        let db = HistoryDb::open_at(tmp.path().join("history.db")).unwrap();
        (tmp, db)
    }

    #[test]
    fn test_record_and_recent() {
        let (_tmp, db) = test_db();

        db.record("open resume.pdf", Intent::OpenFile).unwrap();
        db.record("play music", Intent::PlayMusic).unwrap();

        let entries = db.recent(10).unwrap();
        assert_eq!(entries.len(), 2);
        // Newest first
        assert_eq!(entries[0].raw_text, "play music");
        assert_eq!(entries[0].intent, "play_music");
        assert_eq!(entries[1].raw_text, "open resume.pdf");
    }

    #[test]
    fn test_recent_respects_limit() {
        let (_tmp, db) = test_db();
        for i in 0..5 {
            db.record(&format!("command {}", i), Intent::SearchFile)
                .unwrap();
        }
        assert_eq!(db.recent(3).unwrap().len(), 3);
        assert_eq!(db.count().unwrap(), 5);
    }

    #[test]
    fn test_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("deep").join("nested").join("history.db");
        let db = HistoryDb::open_at(&nested).unwrap();
        db.record("open a.txt", Intent::OpenFile).unwrap();
        assert!(nested.exists());
    }
}

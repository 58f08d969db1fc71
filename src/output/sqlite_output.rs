//! SQLite results sink
//!
//! Stores each run and its full result table in a SQLite database. Every
//! run appends; earlier runs are kept.

use crate::output::traits::{OutputHandler, OutputResult, SweepReport};
use rusqlite::{params, Connection};
use std::path::PathBuf;

/// SQL schema for the results database
pub const SCHEMA_SQL: &str = r#"
-- One row per sweep
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    total_records INTEGER NOT NULL
);

-- One row per input record
CREATE TABLE IF NOT EXISTS results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    record_index INTEGER NOT NULL,
    website TEXT,
    resolved_url TEXT,
    emails TEXT NOT NULL,
    email_status TEXT NOT NULL,
    error_kind TEXT,
    error_message TEXT,
    used_detailed INTEGER NOT NULL,
    UNIQUE(run_id, record_index)
);

CREATE INDEX IF NOT EXISTS idx_results_run ON results(run_id);

-- One row per record and category
CREATE TABLE IF NOT EXISTS result_flags (
    result_id INTEGER NOT NULL REFERENCES results(id),
    category TEXT NOT NULL,
    flag TEXT NOT NULL,
    PRIMARY KEY(result_id, category)
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// Writes each run into a SQLite database
pub struct SqliteOutput {
    path: PathBuf,
}

impl SqliteOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;
        Ok(conn)
    }
}

/// Inserts one run and all its results; returns the run id
pub fn insert_report(conn: &mut Connection, report: &SweepReport<'_>) -> rusqlite::Result<i64> {
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO runs (started_at, finished_at, config_hash, total_records)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            report.started_at.to_rfc3339(),
            report.finished_at.to_rfc3339(),
            report.config_hash,
            report.results.len() as i64
        ],
    )?;
    let run_id = tx.last_insert_rowid();

    {
        let mut insert_result = tx.prepare(
            "INSERT INTO results (run_id, record_index, website, resolved_url, emails,
                                  email_status, error_kind, error_message, used_detailed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        let mut insert_flag = tx.prepare(
            "INSERT INTO result_flags (result_id, category, flag) VALUES (?1, ?2, ?3)",
        )?;

        for result in report.results {
            let emails = result.emails.iter().cloned().collect::<Vec<_>>().join(", ");
            insert_result.execute(params![
                run_id,
                result.index as i64,
                result.website_raw,
                result.website_resolved.as_ref().map(|u| u.to_string()),
                emails,
                result.email_status.as_str(),
                result.error.as_ref().map(|e| e.kind()),
                result.error.as_ref().map(|e| e.to_string()),
                result.used_detailed,
            ])?;
            let result_id = tx.last_insert_rowid();

            for (category, flag) in report.categories.iter().zip(result.flags.iter()) {
                insert_flag.execute(params![result_id, category, flag.as_str()])?;
            }
        }
    }

    tx.commit()?;
    Ok(run_id)
}

impl OutputHandler for SqliteOutput {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn write_report(&self, report: &SweepReport<'_>) -> OutputResult<()> {
        let mut conn = self.open()?;
        let run_id = insert_report(&mut conn, report)?;
        tracing::info!(
            "Stored run {} ({} results) in {}",
            run_id,
            report.results.len(),
            self.path.display()
        );
        Ok(())
    }
}

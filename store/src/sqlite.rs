//! SQLite-backed [`ResultStore`].
//!
//! Numbers are stored as decimal TEXT so records never truncate to 64 bits.
//! Ordering between stored numbers is done by length then text, which is
//! numeric ordering for decimal strings without leading zeros.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, params};

use lychrel_types::{BestMap, IterationRecord, Number};

use crate::secure_fs::prepare_db_path;
use crate::{CheckpointEntry, INITIAL_CHECKPOINT, ResultStore, Snapshot};

/// Result store persisted in a single SQLite database.
pub struct SqliteStore {
    db: Connection,
}

impl SqliteStore {
    const SCHEMA: &'static str = r"
        CREATE TABLE IF NOT EXISTS results (
            iteration_count INTEGER UNIQUE NOT NULL,
            minimal_number TEXT NOT NULL,
            recorded_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS checkpoints (
            id INTEGER PRIMARY KEY,
            last_number TEXT NOT NULL,
            recorded_at TEXT NOT NULL
        );
    ";

    /// Upsert that only ever lowers `minimal_number`.
    const UPSERT_RECORD: &'static str = "
        INSERT INTO results (iteration_count, minimal_number, recorded_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(iteration_count) DO UPDATE SET
            minimal_number = excluded.minimal_number,
            recorded_at = excluded.recorded_at
        WHERE length(excluded.minimal_number) < length(results.minimal_number)
           OR (length(excluded.minimal_number) = length(results.minimal_number)
               AND excluded.minimal_number < results.minimal_number)
    ";

    /// Open or create the store database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        prepare_db_path(path)?;

        let db = Connection::open(path)
            .with_context(|| format!("Failed to open result store at {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Opened result store");
        Self::initialize(db)
    }

    /// Open an in-memory store (for testing and dry runs).
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory result store")?;
        Self::initialize(db)
    }

    fn initialize(db: Connection) -> Result<Self> {
        db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")
            .context("Failed to set result store pragmas")?;
        db.execute_batch(Self::SCHEMA)
            .context("Failed to create result store schema")?;
        Ok(Self { db })
    }

    fn load_records(&self) -> Result<BestMap> {
        let mut stmt = self
            .db
            .prepare("SELECT iteration_count, minimal_number FROM results")
            .context("Failed to prepare results query")?;

        let rows = stmt
            .query_map([], |row| {
                let iterations: u32 = row.get(0)?;
                let number: String = row.get(1)?;
                Ok((iterations, number))
            })
            .context("Failed to query results")?;

        let mut records = BestMap::new();
        for row in rows {
            let (iterations, number) = row.context("Failed to read result row")?;
            let number = parse_number(&number)
                .with_context(|| format!("Corrupt result for {iterations} iterations"))?;
            records.observe(iterations, number);
        }
        Ok(records)
    }
}

impl ResultStore for SqliteStore {
    fn load(&self) -> Result<Snapshot> {
        let records = self.load_records()?;
        let checkpoint = self
            .checkpoint_history()?
            .into_iter()
            .map(|entry| entry.last_number)
            .max()
            .unwrap_or_else(|| Number::from(INITIAL_CHECKPOINT));
        Ok(Snapshot {
            records,
            checkpoint,
        })
    }

    fn commit(&mut self, records: &[IterationRecord], checkpoint: &Number) -> Result<()> {
        let recorded_at = now_rfc3339();
        let tx = self
            .db
            .transaction()
            .context("Failed to start commit transaction")?;

        for record in records {
            tx.execute(
                Self::UPSERT_RECORD,
                params![record.iterations, record.number.to_string(), &recorded_at],
            )
            .with_context(|| {
                format!(
                    "Failed to write record for {} iterations",
                    record.iterations
                )
            })?;
        }

        tx.execute(
            "INSERT INTO checkpoints (last_number, recorded_at) VALUES (?1, ?2)",
            params![checkpoint.to_string(), &recorded_at],
        )
        .context("Failed to append checkpoint")?;

        tx.commit().context("Failed to commit session")?;

        tracing::debug!(
            records = records.len(),
            %checkpoint,
            "Committed session"
        );
        Ok(())
    }

    fn list_records(&self) -> Result<Vec<IterationRecord>> {
        let mut stmt = self
            .db
            .prepare(
                "SELECT iteration_count, minimal_number
                 FROM results
                 ORDER BY iteration_count ASC",
            )
            .context("Failed to prepare list_records query")?;

        let rows = stmt
            .query_map([], |row| {
                let iterations: u32 = row.get(0)?;
                let number: String = row.get(1)?;
                Ok((iterations, number))
            })
            .context("Failed to query results")?;

        let mut records = Vec::new();
        for row in rows {
            let (iterations, number) = row.context("Failed to read result row")?;
            let number = parse_number(&number)
                .with_context(|| format!("Corrupt result for {iterations} iterations"))?;
            records.push(IterationRecord::new(iterations, number));
        }
        Ok(records)
    }

    fn checkpoint_history(&self) -> Result<Vec<CheckpointEntry>> {
        let mut stmt = self
            .db
            .prepare("SELECT last_number, recorded_at FROM checkpoints ORDER BY id ASC")
            .context("Failed to prepare checkpoint query")?;

        let rows = stmt
            .query_map([], |row| {
                let last_number: String = row.get(0)?;
                let recorded_at: String = row.get(1)?;
                Ok((last_number, recorded_at))
            })
            .context("Failed to query checkpoints")?;

        let mut entries = Vec::new();
        for row in rows {
            let (last_number, recorded_at) = row.context("Failed to read checkpoint row")?;
            let last_number = parse_number(&last_number)
                .with_context(|| format!("Corrupt checkpoint recorded at {recorded_at}"))?;
            entries.push(CheckpointEntry {
                last_number,
                recorded_at,
            });
        }
        Ok(entries)
    }
}

fn parse_number(text: &str) -> Result<Number> {
    Number::from_str(text).map_err(|e| anyhow!("invalid number '{text}': {e}"))
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

//! Step timestamp persistence.
//!
//! One sqlite table keyed by the canonical video path. The step list is
//! stored as a JSON array so ordering survives round-trips untouched, and a
//! re-recording simply upserts over the previous row.

use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Errors from the step store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Step list (de)serialization error.
    #[error("step list serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistent store of step timestamps per video.
///
/// Keys are expected to be absolute, canonicalized paths; the caller
/// resolves symlinks and relative paths before handing them in, so the same
/// video reached two ways shares one row.
pub struct StepStore {
    conn: Connection,
}

impl StepStore {
    /// Open (creating if needed) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(&conn)?;
        debug!(path = %path.display(), "opened step store");
        Ok(Self { conn })
    }

    /// Open an in-memory store (tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(Self { conn })
    }

    fn init(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS video_steps (
                path TEXT PRIMARY KEY,
                steps TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Stored steps for a video, or the empty list when none were recorded.
    pub fn steps_for(&self, video: &Path) -> Result<Vec<f64>, StoreError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT steps FROM video_steps WHERE path = ?1",
                params![store_key(video)],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Insert or replace the steps for a video.
    pub fn set_steps(&self, video: &Path, steps: &[f64]) -> Result<(), StoreError> {
        let json = serde_json::to_string(steps)?;
        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO video_steps (path, steps, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (path) DO UPDATE SET
                 steps = excluded.steps,
                 updated_at = excluded.updated_at",
            params![store_key(video), json, now],
        )?;
        debug!(video = %video.display(), count = steps.len(), "saved step list");
        Ok(())
    }

    /// Forget the steps for a video.
    pub fn clear_steps(&self, video: &Path) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM video_steps WHERE path = ?1",
            params![store_key(video)],
        )?;
        Ok(())
    }
}

/// Canonical storage key for a video path.
fn store_key(video: &Path) -> String {
    video.to_string_lossy().into_owned()
}

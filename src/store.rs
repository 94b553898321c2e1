use crate::app_dirs::AppDirs;
use crate::error::{KeysprintError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Record key for the best WPM ever observed
pub const BEST_WPM_KEY: &str = "best_wpm";

/// Persistence seam for the best-WPM record
pub trait HighScoreStore {
    /// Stored best, `Ok(0)` when no record exists yet
    fn load_best(&self) -> Result<u32>;
    fn save_best(&mut self, wpm: u32) -> Result<()>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load_best(&self) -> Result<u32> {
        (**self).load_best()
    }

    fn save_best(&mut self, wpm: u32) -> Result<()> {
        (**self).save_best(wpm)
    }
}

/// Key-value table in a SQLite database
#[derive(Debug)]
pub struct SqliteHighScoreStore {
    conn: Connection,
}

impl SqliteHighScoreStore {
    /// Open (creating if needed) the database under the state directory
    pub fn open_default() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("keysprint_state.db"));
        Self::open(db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}

impl HighScoreStore for SqliteHighScoreStore {
    fn load_best(&self) -> Result<u32> {
        match self.get(BEST_WPM_KEY)? {
            None => Ok(0),
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                KeysprintError::Store(format!("corrupt {BEST_WPM_KEY} record: {raw:?}"))
            }),
        }
    }

    fn save_best(&mut self, wpm: u32) -> Result<()> {
        self.set(BEST_WPM_KEY, &wpm.to_string())
    }
}

/// Process-local store; clones share the same record
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    best: Rc<Cell<u32>>,
}

impl MemoryHighScoreStore {
    pub fn new(initial: u32) -> Self {
        Self {
            best: Rc::new(Cell::new(initial)),
        }
    }

    pub fn value(&self) -> u32 {
        self.best.get()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load_best(&self) -> Result<u32> {
        Ok(self.best.get())
    }

    fn save_best(&mut self, wpm: u32) -> Result<()> {
        self.best.set(wpm);
        Ok(())
    }
}

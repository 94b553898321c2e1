use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::language::Difficulty;
use crate::session::Mode;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// One finished (or abandoned) session, as written to the history log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub date: DateTime<Local>,
    pub difficulty: Difficulty,
    pub mode: Mode,
    /// Configured countdown; empty for endless sessions
    pub duration_secs: Option<u64>,
    pub elapsed_secs: f64,
    pub wpm: u32,
    pub accuracy: u32,
    pub correct: usize,
    pub incorrect: usize,
}

/// Append-only CSV log of session results
#[derive(Debug, Clone)]
pub struct SessionHistory {
    path: PathBuf,
}

impl SessionHistory {
    pub fn open_default() -> Self {
        Self::with_path(
            AppDirs::history_path().unwrap_or_else(|| PathBuf::from("keysprint_history.csv")),
        )
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, summary: &SessionSummary) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(summary)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<SessionSummary>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn summary(wpm: u32, mode: Mode) -> SessionSummary {
        SessionSummary {
            date: Local::now(),
            difficulty: Difficulty::Hard,
            mode,
            duration_secs: (mode == Mode::Timed).then_some(30),
            elapsed_secs: 30.0,
            wpm,
            accuracy: 97,
            correct: 200,
            incorrect: 6,
        }
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempdir().unwrap();
        let history = SessionHistory::with_path(dir.path().join("logs").join("history.csv"));

        history.append(&summary(55, Mode::Timed)).unwrap();
        history.append(&summary(61, Mode::Endless)).unwrap();

        let raw = std::fs::read_to_string(history.path()).unwrap();
        assert_eq!(raw.matches("date,difficulty").count(), 1);
        assert_eq!(raw.lines().count(), 3);
    }

    #[test]
    fn test_load_round_trips_rows() {
        let dir = tempdir().unwrap();
        let history = SessionHistory::with_path(dir.path().join("history.csv"));
        history.append(&summary(55, Mode::Timed)).unwrap();
        history.append(&summary(61, Mode::Endless)).unwrap();

        let rows = history.load().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].wpm, 55);
        assert_eq!(rows[0].duration_secs, Some(30));
        assert_eq!(rows[1].mode, Mode::Endless);
        assert_eq!(rows[1].duration_secs, None);
        assert_eq!(rows[1].difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let history = SessionHistory::with_path(dir.path().join("none.csv"));
        assert!(history.load().unwrap().is_empty());
    }
}

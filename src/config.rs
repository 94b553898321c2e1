use crate::app_dirs::AppDirs;
use crate::language::Difficulty;
use crate::session::{Mode, StreamSizing};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DURATION_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default, deserialize_with = "lenient_duration")]
    pub duration_secs: Option<u64>,
    #[serde(default)]
    pub stream: StreamSizing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            mode: Mode::Endless,
            duration_secs: None,
            stream: StreamSizing::Estimated,
        }
    }
}

impl Config {
    /// Timed-mode duration, falling back to the default when unset or invalid
    pub fn duration_secs(&self) -> u64 {
        match self.duration_secs {
            Some(secs) if secs > 0 => secs,
            _ => DEFAULT_DURATION_SECS,
        }
    }
}

/// Parse a user-supplied duration. Zero, negative and non-numeric input yield `None`.
pub fn parse_duration(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<i64>() {
        return u64::try_from(secs).ok().filter(|s| *s > 0);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.5)
        .map(|secs| secs.round() as u64)
}

fn lenient_duration<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|secs| u64::try_from(secs).ok())
            .filter(|secs| *secs > 0)
            .or_else(|| n.as_f64().and_then(|f| parse_duration(&f.to_string()))),
        serde_json::Value::String(s) => parse_duration(&s),
        _ => None,
    })
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> crate::error::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("keysprint_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!("ignoring unreadable config {:?}: {}", self.path, e),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> crate::error::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            difficulty: Difficulty::Hard,
            mode: Mode::Timed,
            duration_secs: Some(30),
            stream: StreamSizing::Fixed(4000),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn corrupt_file_loads_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn lenient_fields_fall_back() {
        let raw = r#"{"difficulty": "insane", "mode": "timed", "duration_secs": -5}"#;
        let cfg: Config = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.difficulty, Difficulty::Medium);
        assert_eq!(cfg.mode, Mode::Timed);
        assert_eq!(cfg.duration_secs, None);
        assert_eq!(cfg.duration_secs(), DEFAULT_DURATION_SECS);

        let cfg: Config = serde_json::from_str(r#"{"duration_secs": "soon"}"#).unwrap();
        assert_eq!(cfg.duration_secs(), DEFAULT_DURATION_SECS);

        let cfg: Config = serde_json::from_str(r#"{"duration_secs": "45"}"#).unwrap();
        assert_eq!(cfg.duration_secs(), 45);

        let cfg: Config = serde_json::from_str(r#"{"duration_secs": 0}"#).unwrap();
        assert_eq!(cfg.duration_secs(), DEFAULT_DURATION_SECS);
    }

    #[test]
    fn parse_duration_rules() {
        assert_eq!(parse_duration("30"), Some(30));
        assert_eq!(parse_duration(" 90 "), Some(90));
        assert_eq!(parse_duration("12.6"), Some(13));
        assert_eq!(parse_duration("0"), None);
        assert_eq!(parse_duration("-10"), None);
        assert_eq!(parse_duration("-2.5"), None);
        assert_eq!(parse_duration("ten"), None);
        assert_eq!(parse_duration("NaN"), None);
    }
}

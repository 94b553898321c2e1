use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::difficulty::Difficulty;
use crate::error::{KeysprintError, Result};

static LANG_DIR: Dir = include_dir!("src/lang");

static EMBEDDED_BANK: OnceLock<WordBank> = OnceLock::new();

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    pub fn load(difficulty: Difficulty) -> Result<Self> {
        read_language_from_file(format!("{}.json", difficulty.key()))
    }
}

fn read_language_from_file(file_name: String) -> Result<Language> {
    let file = LANG_DIR
        .get_file(&file_name)
        .ok_or_else(|| KeysprintError::Store(format!("word bank {file_name} not found")))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| KeysprintError::Store(format!("word bank {file_name} is not utf-8")))?;

    let lang: Language = from_str(file_as_str)?;
    if lang.words.is_empty() {
        return Err(KeysprintError::Store(format!("word bank {file_name} is empty")));
    }

    Ok(lang)
}

/// Difficulty-keyed word lists. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct WordBank {
    banks: HashMap<Difficulty, Language>,
}

impl WordBank {
    pub fn load_embedded() -> Result<Self> {
        let mut banks = HashMap::new();
        for difficulty in Difficulty::ALL {
            banks.insert(difficulty, Language::load(difficulty)?);
        }
        Ok(Self { banks })
    }

    /// Process-wide bank parsed from the JSON compiled into the binary.
    pub fn embedded() -> &'static WordBank {
        EMBEDDED_BANK.get_or_init(|| {
            WordBank::load_embedded().expect("embedded word banks must parse")
        })
    }

    pub fn words(&self, difficulty: Difficulty) -> &[String] {
        self.banks
            .get(&difficulty)
            .or_else(|| self.banks.get(&Difficulty::Medium))
            .map(|lang| lang.words.as_slice())
            .unwrap_or(&[])
    }
}

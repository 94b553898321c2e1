use serde::{Deserialize, Serialize};

/// Words per chunk in endless mode
pub const CHUNK_WORDS: usize = 20;

/// Remaining untyped characters below which the stream is extended
pub const LOW_WATER_MARK: usize = 200;

/// Characters appended per stream extension
pub const EXTENSION_CHARS: usize = 2000;

/// Budget of [`StreamSizing::large`], enough that a timed session never extends
pub const LARGE_STREAM_CHARS: usize = 100_000;

/// Accounts for average word length plus spacing when estimating stream size
pub const OVERHEAD_FACTOR: f64 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Session shape
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Fixed 20-word chunks that roll over forever
    #[default]
    Endless,
    /// One growing stream against a countdown
    Timed,
}

impl Mode {
    pub fn toggle(&self) -> Self {
        match self {
            Mode::Endless => Mode::Timed,
            Mode::Timed => Mode::Endless,
        }
    }
}

/// How the initial timed-mode stream is sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamSizing {
    /// Derived from the configured duration
    #[default]
    Estimated,
    /// A fixed character budget
    Fixed(usize),
}

impl StreamSizing {
    pub const fn large() -> Self {
        StreamSizing::Fixed(LARGE_STREAM_CHARS)
    }

    pub fn initial_chars(&self, duration_secs: u64) -> usize {
        match self {
            StreamSizing::Estimated => estimated_stream_chars(duration_secs),
            StreamSizing::Fixed(chars) => *chars,
        }
    }
}

/// `round((duration / 60) * 5 * 5 * overhead)`
pub fn estimated_stream_chars(duration_secs: u64) -> usize {
    let minutes = duration_secs as f64 / 60.0;
    (minutes * 5.0 * 5.0 * OVERHEAD_FACTOR).round() as usize
}

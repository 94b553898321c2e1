use serde::Serialize;

/// Characters per standard "word"
pub const CHARS_PER_WORD: f64 = 5.0;

/// Floor applied to elapsed minutes before dividing (one second)
pub const MIN_ELAPSED_MINUTES: f64 = 1.0 / 60.0;

/// Per-position classification of the target text
#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CharState {
    Untyped,
    Correct,
    Incorrect,
    Current,
}

/// Result of diffing typed input against a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub states: Vec<CharState>,
    pub correct: usize,
    pub incorrect: usize,
    /// Cursor position; reported apart from `states` and never counted
    pub current: usize,
}

impl Classification {
    pub fn typed(&self) -> usize {
        self.correct + self.incorrect
    }

    /// States with the cursor position overlaid as [`CharState::Current`]
    pub fn display_states(&self) -> Vec<CharState> {
        let mut states = self.states.clone();
        if let Some(state) = states.get_mut(self.current) {
            if *state == CharState::Untyped {
                *state = CharState::Current;
            }
        }
        states
    }
}

/// Compare `typed` against `target` position by position.
///
/// Positions past the end of `typed` are untyped. Positions of `typed` past
/// the end of `target` are not considered.
pub fn classify(target: &[char], typed: &[char]) -> Classification {
    let mut correct = 0;
    let mut incorrect = 0;

    let states = target
        .iter()
        .enumerate()
        .map(|(i, expected)| match typed.get(i) {
            None => CharState::Untyped,
            Some(c) if c == expected => {
                correct += 1;
                CharState::Correct
            }
            Some(_) => {
                incorrect += 1;
                CharState::Incorrect
            }
        })
        .collect();

    let current = typed.len().min(target.len().saturating_sub(1));

    Classification {
        states,
        correct,
        incorrect,
        current,
    }
}

/// Percentage of correct keystrokes, 100 when nothing has been typed
pub fn accuracy(correct: usize, incorrect: usize) -> u32 {
    let total = correct + incorrect;
    if total == 0 {
        return 100;
    }
    (correct as f64 / total as f64 * 100.0).round().max(0.0) as u32
}

/// Words per minute from correct characters only
pub fn wpm(correct: usize, elapsed_secs: f64) -> u32 {
    let minutes = (elapsed_secs / 60.0).max(MIN_ELAPSED_MINUTES);
    ((correct as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

/// Derived metrics for the current moment of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionStats {
    pub correct: usize,
    pub incorrect: usize,
    pub accuracy: u32,
    pub wpm: u32,
    pub elapsed_secs: f64,
}

impl SessionStats {
    pub fn compute(correct: usize, incorrect: usize, elapsed_secs: f64) -> Self {
        Self {
            correct,
            incorrect,
            accuracy: accuracy(correct, incorrect),
            wpm: wpm(correct, elapsed_secs),
            elapsed_secs,
        }
    }

    pub fn typed(&self) -> usize {
        self.correct + self.incorrect
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            correct: 0,
            incorrect: 0,
            accuracy: 100,
            wpm: 0,
            elapsed_secs: 0.0,
        }
    }
}

use crate::config::Config;
use crate::history::{SessionHistory, SessionSummary};
use crate::language::Difficulty;
use crate::runtime::{Cadence, Clock};
use crate::session::{Mode, SessionState, CHUNK_WORDS, EXTENSION_CHARS, LOW_WATER_MARK};
use crate::stats::{classify, CharState, SessionStats};
use crate::store::HighScoreStore;
use crate::time_series::{TimeSeriesPoint, WpmSampler};
use crate::typing_policy::{apply_input, InputEvent};
use crate::word_generator::{SizeSpec, WordGenerator};
use chrono::Local;
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One target character and how it renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharCell {
    pub ch: char,
    pub state: CharState,
}

/// Immutable view of the session published after every state change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub characters: Vec<CharCell>,
    pub current_index: usize,
    pub wpm: u32,
    pub best_wpm: u32,
    pub accuracy: u32,
    pub chars_typed: usize,
    pub chars_total: usize,
    pub state: SessionState,
    /// Countdown; only present in timed mode
    pub remaining_secs: Option<f64>,
    pub elapsed_secs: f64,
    pub difficulty: Difficulty,
    pub mode: Mode,
    pub wpm_samples: Vec<TimeSeriesPoint>,
}

impl Snapshot {
    pub fn target_text(&self) -> String {
        self.characters.iter().map(|cell| cell.ch).collect()
    }
}

/// Typing session controller: owns lifecycle, timing and the text supply.
pub struct SessionEngine<R: Rng = StdRng> {
    config: Config,
    /// Configuration the current text was prepared for
    active: Config,
    generator: WordGenerator<R>,
    clock: Box<dyn Clock>,
    store: Box<dyn HighScoreStore>,
    history: Option<SessionHistory>,

    state: SessionState,
    target: Vec<char>,
    typed: Vec<char>,
    /// Prepared text nobody has typed against yet
    fresh_text: bool,

    started_at: Option<Duration>,
    first_key_at: Option<Duration>,
    global_correct: usize,
    global_incorrect: usize,
    expected_total: usize,
    chunks_completed: usize,
    stats: SessionStats,
    best_wpm: u32,
    remaining_secs: Option<f64>,
    cadence: Cadence,
    sampler: WpmSampler,
    snapshot: Snapshot,
}

impl<R: Rng> SessionEngine<R> {
    pub fn new(
        config: Config,
        generator: WordGenerator<R>,
        clock: impl Clock + 'static,
        store: impl HighScoreStore + 'static,
    ) -> Self {
        let best_wpm = store.load_best().unwrap_or_else(|e| {
            warn!("no usable high score, starting from 0: {}", e);
            0
        });

        let mut engine = Self {
            active: config.clone(),
            config,
            generator,
            clock: Box::new(clock),
            store: Box::new(store),
            history: None,
            state: SessionState::Idle,
            target: Vec::new(),
            typed: Vec::new(),
            fresh_text: false,
            started_at: None,
            first_key_at: None,
            global_correct: 0,
            global_incorrect: 0,
            expected_total: 0,
            chunks_completed: 0,
            stats: SessionStats::default(),
            best_wpm,
            remaining_secs: None,
            cadence: Cadence::default(),
            sampler: WpmSampler::default(),
            snapshot: Snapshot {
                characters: Vec::new(),
                current_index: 0,
                wpm: 0,
                best_wpm,
                accuracy: 100,
                chars_typed: 0,
                chars_total: 0,
                state: SessionState::Idle,
                remaining_secs: None,
                elapsed_secs: 0.0,
                difficulty: Difficulty::Medium,
                mode: Mode::Endless,
                wpm_samples: Vec::new(),
            },
        };
        engine.prepare_text();
        engine.clear_progress();
        engine.publish();
        engine
    }

    /// Append a summary row to `history` whenever a session ends
    pub fn with_history(mut self, history: SessionHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Takes effect on the next `start()` or `reset()`
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn best_wpm(&self) -> u32 {
        self.best_wpm
    }

    pub fn target_text(&self) -> String {
        self.target.iter().collect()
    }

    pub fn typed_text(&self) -> String {
        self.typed.iter().collect()
    }

    pub fn chunks_completed(&self) -> usize {
        self.chunks_completed
    }

    /// Counts folded in from finished chunks (endless mode)
    pub fn global_counts(&self) -> (usize, usize) {
        (self.global_correct, self.global_incorrect)
    }

    pub fn is_ticking(&self) -> bool {
        self.cadence.is_running()
    }

    pub fn start(&mut self) {
        if self.state == SessionState::Running {
            return;
        }
        if !self.fresh_text || self.active != self.config {
            self.prepare_text();
        }
        self.clear_progress();
        self.fresh_text = false;
        self.started_at = Some(self.clock.now());
        self.state = SessionState::Running;
        if self.active.mode == Mode::Timed {
            self.cadence.start();
        }

        info!(
            "session started: mode={} difficulty={} chars={}",
            self.active.mode,
            self.active.difficulty,
            self.target.len()
        );
        self.publish();
    }

    /// Back to Idle with fresh text. A second reset in a row changes nothing.
    pub fn reset(&mut self) {
        if self.state == SessionState::Running && self.stats.typed() > 0 {
            self.record_history();
        }

        let pristine =
            self.state == SessionState::Idle && self.fresh_text && self.active == self.config;

        self.state = SessionState::Idle;
        if !pristine {
            self.prepare_text();
            debug!("session reset");
        }
        self.clear_progress();
        self.publish();
    }

    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Feed one normalized keystroke. Returns false when the event was ignored.
    ///
    /// In timed mode a keystroke at or past the deadline ends the session
    /// instead of being typed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if self.state != SessionState::Running {
            return false;
        }

        let now = self.clock.now();
        if self.is_expired(now) {
            self.expire(now);
            self.publish();
            return false;
        }
        if event.as_char().is_some() && self.typed.len() >= self.target.len() {
            return false;
        }

        if self.first_key_at.is_none() {
            self.first_key_at = Some(now);
        }

        apply_input(&mut self.typed, event);

        match self.active.mode {
            Mode::Endless => {
                if self.typed.len() >= self.target.len() {
                    self.roll_over_chunk();
                }
            }
            Mode::Timed => self.extend_stream_if_needed(),
        }

        self.refresh_stats(now);
        self.publish();
        true
    }

    /// Advance the countdown; the session finishes once it reaches zero.
    /// Returns false when the cadence is stopped.
    pub fn tick(&mut self) -> bool {
        if !self.cadence.is_running() || self.state != SessionState::Running {
            return false;
        }

        let now = self.clock.now();
        if self.is_expired(now) {
            self.expire(now);
        } else {
            let duration = self.active.duration_secs() as f64;
            self.remaining_secs = Some(duration - self.since_start(now));
            self.refresh_stats(now);
        }
        self.publish();
        true
    }

    /// Summary of the session so far
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            date: Local::now(),
            difficulty: self.active.difficulty,
            mode: self.active.mode,
            duration_secs: (self.active.mode == Mode::Timed).then(|| self.active.duration_secs()),
            elapsed_secs: self.stats.elapsed_secs,
            wpm: self.stats.wpm,
            accuracy: self.stats.accuracy,
            correct: self.stats.correct,
            incorrect: self.stats.incorrect,
        }
    }

    fn is_expired(&self, now: Duration) -> bool {
        self.active.mode == Mode::Timed
            && self.since_start(now) >= self.active.duration_secs() as f64
    }

    /// Freeze stats at the deadline and finish
    fn expire(&mut self, now: Duration) {
        self.remaining_secs = Some(0.0);
        self.refresh_stats(now);
        self.finish();
    }

    fn finish(&mut self) {
        self.state = SessionState::Finished;
        self.cadence.stop();
        info!(
            "session finished: wpm={} accuracy={}% best={}",
            self.stats.wpm, self.stats.accuracy, self.best_wpm
        );
        self.record_history();
    }

    fn record_history(&self) {
        if let Some(history) = &self.history {
            if let Err(e) = history.append(&self.summary()) {
                warn!("failed to append session history: {}", e);
            }
        }
    }

    fn prepare_text(&mut self) {
        self.active = self.config.clone();
        self.typed.clear();
        self.target = match self.active.mode {
            Mode::Endless => self.generate(SizeSpec::Words(CHUNK_WORDS)),
            Mode::Timed => {
                let chars = self
                    .active
                    .stream
                    .initial_chars(self.active.duration_secs());
                self.generate(SizeSpec::MinChars(chars))
            }
        };
        if self.active.mode == Mode::Timed {
            self.extend_stream_if_needed();
        }
        self.expected_total = self.target.len();
        self.fresh_text = true;
    }

    fn clear_progress(&mut self) {
        self.typed.clear();
        self.started_at = None;
        self.first_key_at = None;
        self.global_correct = 0;
        self.global_incorrect = 0;
        self.expected_total = self.target.len();
        self.chunks_completed = 0;
        self.stats = SessionStats::default();
        self.remaining_secs = match self.active.mode {
            Mode::Timed => Some(self.active.duration_secs() as f64),
            Mode::Endless => None,
        };
        self.sampler.clear();
        self.cadence.stop();
    }

    fn generate(&mut self, size: SizeSpec) -> Vec<char> {
        self.generator
            .generate(self.active.difficulty, size)
            .chars()
            .collect()
    }

    fn roll_over_chunk(&mut self) {
        let finished = classify(&self.target, &self.typed);
        self.global_correct += finished.correct;
        self.global_incorrect += finished.incorrect;

        self.target = self.generate(SizeSpec::Words(CHUNK_WORDS));
        self.expected_total += self.target.len();
        self.typed.clear();
        self.chunks_completed += 1;

        debug!(
            "chunk {} done: +{} correct, +{} incorrect",
            self.chunks_completed, finished.correct, finished.incorrect
        );
    }

    fn extend_stream_if_needed(&mut self) {
        while self.target.len() - self.typed.len() < LOW_WATER_MARK {
            let block = self.generate(SizeSpec::MinChars(EXTENSION_CHARS));
            if block.is_empty() {
                break;
            }
            if !self.target.is_empty() {
                self.target.push(' ');
            }
            self.target.extend(block);
            debug!("stream extended to {} chars", self.target.len());
        }
    }

    fn since_start(&self, now: Duration) -> f64 {
        self.started_at
            .map(|start| now.saturating_sub(start).as_secs_f64())
            .unwrap_or(0.0)
    }

    fn elapsed(&self, now: Duration) -> f64 {
        match self.active.mode {
            Mode::Endless => self
                .first_key_at
                .map(|first| now.saturating_sub(first).as_secs_f64())
                .unwrap_or(0.0),
            Mode::Timed => self
                .since_start(now)
                .min(self.active.duration_secs() as f64),
        }
    }

    fn refresh_stats(&mut self, now: Duration) {
        let segment = classify(&self.target, &self.typed);
        let elapsed = self.elapsed(now);
        self.stats = SessionStats::compute(
            self.global_correct + segment.correct,
            self.global_incorrect + segment.incorrect,
            elapsed,
        );
        self.sampler.record(elapsed, self.stats.wpm);
        self.ratchet_best(self.stats.wpm);
    }

    fn ratchet_best(&mut self, wpm: u32) {
        if wpm <= self.best_wpm {
            return;
        }
        self.best_wpm = wpm;
        if let Err(e) = self.store.save_best(wpm) {
            warn!("failed to persist best wpm {}: {}", wpm, e);
        }
        debug!("new best wpm {}", wpm);
    }

    fn publish(&mut self) {
        let segment = classify(&self.target, &self.typed);
        let characters = self
            .target
            .iter()
            .zip(segment.display_states())
            .map(|(&ch, state)| CharCell { ch, state })
            .collect();

        let chars_total = match self.active.mode {
            Mode::Endless => self.expected_total,
            Mode::Timed => self.target.len(),
        };

        self.snapshot = Snapshot {
            characters,
            current_index: segment.current,
            wpm: self.stats.wpm,
            best_wpm: self.best_wpm,
            accuracy: self.stats.accuracy,
            chars_typed: self.stats.typed(),
            chars_total,
            state: self.state,
            remaining_secs: self.remaining_secs,
            elapsed_secs: self.stats.elapsed_secs,
            difficulty: self.active.difficulty,
            mode: self.active.mode,
            wpm_samples: self.sampler.points().to_vec(),
        };
    }
}

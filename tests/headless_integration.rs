use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use keysprint::config::Config;
use keysprint::engine::SessionEngine;
use keysprint::runtime::{
    AppEvent, FixedTicker, ManualClock, Runner, SystemClock, TestEventSource,
};
use keysprint::session::{Mode, SessionState};
use keysprint::store::MemoryHighScoreStore;
use keysprint::typing_policy::normalize_key;
use keysprint::word_generator::WordGenerator;

fn engine_with(config: Config, clock: &ManualClock) -> SessionEngine {
    SessionEngine::new(
        config,
        WordGenerator::seeded(42),
        clock.clone(),
        MemoryHighScoreStore::new(0),
    )
}

fn send_text(tx: &mpsc::Sender<AppEvent>, text: &str) {
    for c in text.chars() {
        tx.send(AppEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }
}

// Headless integration using the runtime + engine without a TTY
#[test]
fn headless_endless_chunk_rolls_over() {
    let clock = ManualClock::new();
    let mut engine = engine_with(Config::default(), &clock);
    engine.start();
    let first_chunk = engine.target_text();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    send_text(&tx, &first_chunk);

    for _ in 0..10_000u32 {
        match runner.step() {
            AppEvent::Key(key) => {
                clock.advance(Duration::from_millis(200));
                if let Some(event) = normalize_key(&key) {
                    assert!(engine.handle_input(event));
                }
            }
            AppEvent::Tick => {
                engine.tick();
            }
            AppEvent::Resize => {}
        }
        if engine.chunks_completed() > 0 {
            break;
        }
    }

    assert_eq!(engine.chunks_completed(), 1);
    assert_eq!(engine.state(), SessionState::Running);
    assert_eq!(engine.typed_text(), "");
    assert_eq!(engine.global_counts(), (first_chunk.chars().count(), 0));

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.accuracy, 100);
    assert!(snapshot.wpm > 0);
    assert!(snapshot.best_wpm >= snapshot.wpm);
    // endless mode never arms the countdown
    assert!(!engine.is_ticking());
    assert_eq!(snapshot.remaining_secs, None);
}

#[test]
fn headless_timed_session_finishes_by_time() {
    let clock = ManualClock::new();
    let config = Config {
        mode: Mode::Timed,
        duration_secs: Some(2),
        ..Config::default()
    };
    let mut engine = engine_with(config, &clock);
    engine.start();
    assert!(engine.is_ticking());

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(20)),
    );
    let prefix: String = engine.target_text().chars().take(4).collect();
    send_text(&tx, &prefix);

    for _ in 0..100u32 {
        match runner.step() {
            AppEvent::Key(key) => {
                if let Some(event) = normalize_key(&key) {
                    engine.handle_input(event);
                }
            }
            AppEvent::Tick => {
                clock.advance(Duration::from_millis(100));
                engine.tick();
            }
            AppEvent::Resize => {}
        }
        if engine.state() == SessionState::Finished {
            break;
        }
    }

    assert_eq!(
        engine.state(),
        SessionState::Finished,
        "timed session should finish by timeout"
    );
    assert!(!engine.is_ticking());
    assert_eq!(engine.snapshot().remaining_secs, Some(0.0));
    assert_eq!(engine.stats().correct, 4);
    assert!(!engine.snapshot().wpm_samples.is_empty());
}

#[test]
fn headless_chords_do_not_type() {
    let clock = ManualClock::new();
    let mut engine = engine_with(Config::default(), &clock);
    engine.start();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    tx.send(AppEvent::Key(KeyEvent::new(
        KeyCode::Char('a'),
        KeyModifiers::CONTROL,
    )))
    .unwrap();
    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)))
        .unwrap();
    tx.send(AppEvent::Resize).unwrap();

    for _ in 0..3 {
        if let AppEvent::Key(key) = runner.step() {
            if let Some(event) = normalize_key(&key) {
                engine.handle_input(event);
            }
        }
    }

    assert_eq!(engine.typed_text(), "");
    assert_eq!(engine.snapshot().chars_typed, 0);
}

#[test]
fn headless_fast_typing_still_ticks_and_finishes() {
    let config = Config {
        mode: Mode::Timed,
        duration_secs: Some(1),
        ..Config::default()
    };
    let mut engine = SessionEngine::new(
        config,
        WordGenerator::seeded(42),
        SystemClock::new(),
        MemoryHighScoreStore::new(0),
    );
    engine.start();
    let text: String = engine.target_text().chars().take(150).collect();

    // keys every 10 ms, well inside the 100 ms tick interval
    let (tx, rx) = mpsc::channel();
    let producer = thread::spawn(move || {
        for c in text.chars() {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            if tx.send(AppEvent::Key(key)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
    });

    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::default());
    let mut ticks = 0;
    let mut keys = 0;
    let started = Instant::now();
    while started.elapsed() < Duration::from_millis(1600) {
        match runner.step() {
            AppEvent::Tick => {
                ticks += 1;
                engine.tick();
            }
            AppEvent::Key(key) => {
                keys += 1;
                if let Some(event) = normalize_key(&key) {
                    engine.handle_input(event);
                }
            }
            AppEvent::Resize => {}
        }
    }
    producer.join().unwrap();

    assert!(keys > 100, "keys={keys}");
    assert!(ticks >= 5, "ticks={ticks}");
    assert_eq!(engine.state(), SessionState::Finished);
    assert_eq!(engine.snapshot().remaining_secs, Some(0.0));
    // keys after the deadline were rejected, so stats cover one second
    assert_eq!(engine.stats().elapsed_secs, 1.0);
    assert!(engine.stats().correct < keys);
}

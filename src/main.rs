use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keysprint::{
    app_dirs::AppDirs,
    config::{parse_duration, Config, ConfigStore, FileConfigStore},
    engine::SessionEngine,
    history::SessionHistory,
    language::Difficulty,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner, SystemClock},
    session::{Mode, SessionState, StreamSizing},
    store::{HighScoreStore, MemoryHighScoreStore, SqliteHighScoreStore},
    typing_policy::normalize_key,
    word_generator::WordGenerator,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    sync::Mutex,
};
use tracing::{info, warn, Level};

/// typing speed trainer with endless and timed sessions
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing speed trainer. Practice on an endless stream of words or against the clock, with live wpm, accuracy and a persisted best score."
)]
pub struct Cli {
    /// word list to draw from: easy, medium or hard (unknown names fall back to medium)
    #[clap(short = 'd', long)]
    difficulty: Option<String>,

    /// session mode
    #[clap(short = 'm', long, value_enum)]
    mode: Option<CliMode>,

    /// timed mode duration in seconds
    #[clap(short = 's', long)]
    duration: Option<String>,

    /// fixed size of the initial timed-mode text instead of the estimate;
    /// without a value a very large text is generated up front
    #[clap(long, num_args = 0..=1)]
    stream_chars: Option<Option<usize>>,

    /// seed the word generator for a reproducible text
    #[clap(long)]
    seed: Option<u64>,

    /// write debug level logs
    #[clap(long)]
    debug: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    Endless,
    Timed,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Endless => Mode::Endless,
            CliMode::Timed => Mode::Timed,
        }
    }
}

impl Cli {
    /// Layer command line choices over the stored configuration
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(key) = &self.difficulty {
            config.difficulty = Difficulty::from_key(key);
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(raw) = &self.duration {
            config.duration_secs = parse_duration(raw);
            if config.duration_secs.is_none() {
                warn!("invalid duration {:?}, using {}s", raw, config.duration_secs());
            }
        }
        match self.stream_chars {
            Some(Some(chars)) => config.stream = StreamSizing::Fixed(chars),
            Some(None) => config.stream = StreamSizing::large(),
            None => {}
        }
        config
    }
}

/// What the event loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Quit,
}

pub struct App<S: ConfigStore> {
    engine: SessionEngine,
    config_store: S,
}

impl<S: ConfigStore> App<S> {
    pub fn new(engine: SessionEngine, config_store: S) -> Self {
        Self {
            engine,
            config_store,
        }
    }

    fn update_config(&mut self, update: impl FnOnce(&mut Config)) {
        let mut config = self.engine.config().clone();
        update(&mut config);
        if let Err(e) = self.config_store.save(&config) {
            warn!("could not save config: {}", e);
        }
        self.engine.set_config(config);
        self.engine.reset();
    }

    fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        match self.engine.state() {
            SessionState::Idle => match key.code {
                KeyCode::Esc => return Control::Quit,
                KeyCode::Enter => self.engine.start(),
                KeyCode::Tab => self.update_config(|c| c.difficulty = c.difficulty.next()),
                KeyCode::Char('m') => self.update_config(|c| c.mode = c.mode.toggle()),
                _ => {}
            },
            SessionState::Running => {
                if key.code == KeyCode::Esc {
                    self.engine.reset();
                } else if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('r')
                {
                    self.engine.restart();
                } else if let Some(event) = normalize_key(&key) {
                    self.engine.handle_input(event);
                }
            }
            SessionState::Finished => match key.code {
                KeyCode::Esc => return Control::Quit,
                KeyCode::Enter | KeyCode::Char('r') => self.engine.restart(),
                KeyCode::Char('n') => self.engine.reset(),
                _ => {}
            },
        }
        Control::Continue
    }

    fn on_tick(&mut self) -> bool {
        self.engine.tick() || self.engine.state() == SessionState::Running
    }
}

fn init_logging(debug: bool) {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(if debug { Level::DEBUG } else { Level::INFO })
        .init();
}

fn open_store() -> Box<dyn HighScoreStore> {
    match SqliteHighScoreStore::open_default() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!("high score database unavailable, best wpm will not persist: {}", e);
            Box::new(MemoryHighScoreStore::new(0))
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.debug);

    let config_store = FileConfigStore::new();
    let config = cli.apply_to(config_store.load());
    if let Err(e) = config_store.save(&config) {
        warn!("could not save config: {}", e);
    }

    let generator = match cli.seed {
        Some(seed) => WordGenerator::seeded(seed),
        None => WordGenerator::from_entropy(),
    };
    let engine = SessionEngine::new(config, generator, SystemClock::new(), open_store())
        .with_history(SessionHistory::open_default());
    let mut app = App::new(engine, config_store);

    info!("keysprint started");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, S: ConfigStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| f.render_widget(app.engine.snapshot(), f.area()))?;

    loop {
        let redraw = match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => true,
            AppEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
                true
            }
        };
        if redraw {
            terminal.draw(|f| f.render_widget(app.engine.snapshot(), f.area()))?;
        }
    }

    Ok(())
}

mod ui;

use bingo::{
    app_dirs::AppDirs,
    bingo::Tier,
    board::Board,
    celebration::{CelebrationAnimation, Effect, EffectSink, Origin},
    config::{Config, ConfigStore, FileConfigStore},
    error::{CellError, StoreError},
    grid::{GridPosition, GRID_SIDE},
    konami::KonamiTracker,
    logging,
    runtime::{BingoEvent, CrosstermEventSource, FixedTicker, Runner},
    schedule::{Scheduler, ThreadScheduler, TimerTick},
    word::{IngestReport, WordEntry, WordKind},
    word_store::{self, FileWordStore, WordStore},
};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    rc::Rc,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;
const FALLBACK_PRESET: &str = "classic";

/// terminal bingo with free spaces, countdown squares and celebrations
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A 5x5 bingo board for meetings and calls: mark squares as things happen, start countdown squares, and celebrate lines and a full house."
)]
pub struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,

    /// word list to play from (defaults to the stored list)
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// play a bundled preset instead of the stored list
    #[clap(short = 'p', long)]
    preset: Option<String>,

    /// keep the word list order instead of shuffling before each deal
    #[clap(long)]
    no_shuffle: bool,

    /// free spaces start unmarked
    #[clap(long)]
    no_free_premark: bool,

    /// disable particle effects
    #[clap(long)]
    no_celebrations: bool,

    /// countdown length for timer words without a usable time
    #[clap(short = 't', long)]
    timer_secs: Option<u32>,

    /// persist these settings as the new defaults
    #[clap(long)]
    save: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// manage the stored word list
    Words {
        #[clap(subcommand)]
        action: WordsCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum WordsCommand {
    /// show every stored word
    List,
    /// append a word
    Add {
        text: String,
        /// field, free or timer
        #[clap(short, long, value_parser = parse_kind, default_value = "field")]
        kind: WordKind,
        /// countdown seconds for timer words
        #[clap(short, long)]
        time: Option<u32>,
    },
    /// remove the word at INDEX (as shown by `list`)
    Remove { index: usize },
    /// replace the list from a .json or .csv file
    Import { file: PathBuf },
    /// write the list to a .json or .csv file
    Export { file: PathBuf },
    /// replace the list with a bundled preset
    Preset { name: String },
    /// list bundled presets
    Presets,
}

fn parse_kind(s: &str) -> Result<WordKind, String> {
    WordKind::from_wire(s).ok_or_else(|| format!("unknown word kind `{s}` (field, free, timer)"))
}

impl Cli {
    /// Stored settings with this run's flags applied on top.
    fn effective_config(&self, mut config: Config) -> Config {
        if let Some(words) = &self.words {
            config.words_file = Some(words.clone());
        }
        if self.no_shuffle {
            config.shuffle = false;
        }
        if self.no_free_premark {
            config.free_premarked = false;
        }
        if self.no_celebrations {
            config.celebrations = false;
        }
        if let Some(secs) = self.timer_secs {
            config.default_timer_secs = secs.max(1);
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub board: Board,
    pub celebration: CelebrationAnimation,
    pub cursor: GridPosition,
    pub last_tier: Option<Tier>,
    pub config: Config,
    pub screen: Rect,
    entries: Vec<WordEntry>,
    konami: KonamiTracker,
}

impl App {
    pub fn new(
        entries: Vec<WordEntry>,
        config: Config,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self, CellError> {
        let mut rng = rand::thread_rng();
        let dealt = word_store::deal(entries.clone(), config.shuffle, &mut rng);
        let board = Board::assemble(&dealt, &mut rng, scheduler, config.cell_options())?;

        let mut celebration = CelebrationAnimation::new();
        celebration.enabled = config.celebrations;

        Ok(Self {
            board,
            celebration,
            cursor: GridPosition::default(),
            last_tier: None,
            config,
            screen: Rect::new(0, 0, 80, 24),
            entries,
            konami: KonamiTracker::default(),
        })
    }

    pub fn redeal(&mut self) -> Result<(), CellError> {
        let mut rng = rand::thread_rng();
        let dealt = word_store::deal(self.entries.clone(), self.config.shuffle, &mut rng);
        self.board.reassemble(&dealt, &mut rng)?;
        self.last_tier = None;
        self.celebration.particles.clear();
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = Rect::new(0, 0, width, height);
        self.celebration.set_stage(ui::stage_for(self.screen));
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Result<Control, CellError> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Control::Quit);
        }
        if self.konami.push(key.code) {
            log::info!("konami code entered");
            self.celebration.fire(Effect::Firework);
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(Control::Quit),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let fired = self.board.primary(self.cursor, None, &mut self.celebration);
                self.note(fired);
            }
            KeyCode::Char('x') => {
                let fired = self.board.secondary(self.cursor, &mut self.celebration);
                self.note(fired);
            }
            KeyCode::Char('r') => self.redeal()?,
            _ => {}
        }
        Ok(Control::Continue)
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let Some(position) = ui::hit_test(self.screen, mouse.column, mouse.row) else {
            return;
        };
        self.cursor = position;
        let fired = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let origin = Origin {
                    x: mouse.column,
                    y: mouse.row,
                };
                self.board
                    .primary(position, Some(origin), &mut self.celebration)
            }
            MouseEventKind::Down(MouseButton::Right) => {
                self.board.secondary(position, &mut self.celebration)
            }
            _ => None,
        };
        self.note(fired);
    }

    pub fn on_timer(&mut self, tick: TimerTick) {
        let fired = self.board.on_timer_tick(tick, &mut self.celebration);
        self.note(fired);
    }

    fn note(&mut self, fired: Option<Tier>) {
        if fired.is_some() {
            self.last_tier = fired;
        }
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let clamp = |v: isize| v.clamp(0, GRID_SIDE as isize - 1) as usize;
        let row = clamp(self.cursor.row() as isize + d_row);
        let column = clamp(self.cursor.column() as isize + d_col);
        if let Some(position) = GridPosition::from_row_col(row, column) {
            self.cursor = position;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config_store = FileConfigStore::new();
    let config = cli.effective_config(config_store.load());

    if let Some(Command::Words { action }) = &cli.command {
        if let Err(e) = logging::init_stderr_logger() {
            eprintln!("logging disabled: {e}");
        }
        let mut store = FileWordStore::new(config.words_path(), config.default_timer_secs);
        return run_words(
            action.clone(),
            &mut store,
            config.default_timer_secs,
            &mut io::stdout(),
        );
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init_file_logger(&path) {
            eprintln!("logging disabled: {e}");
        }
    }

    if cli.save {
        config_store.save(&config)?;
        log::info!("saved settings");
    }

    let entries = load_entries(cli.preset.as_deref(), &config)?;

    let events = CrosstermEventSource::new();
    let scheduler = Rc::new(ThreadScheduler::new(events.sender()));
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));
    let mut app = App::new(entries, config, scheduler)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn load_entries(preset: Option<&str>, config: &Config) -> Result<Vec<WordEntry>, Box<dyn Error>> {
    let secs = config.default_timer_secs;
    if let Some(name) = preset {
        return Ok(word_store::load_preset(name, secs)?.entries);
    }

    let store = FileWordStore::new(config.words_path(), secs);
    let entries = store.list()?;
    if entries.is_empty() {
        log::info!(
            "{} has no words, playing the {FALLBACK_PRESET} preset",
            store.path().display()
        );
        return Ok(word_store::load_preset(FALLBACK_PRESET, secs)?.entries);
    }
    Ok(entries)
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<CrosstermEventSource, FixedTicker>,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            BingoEvent::Tick => {
                if !app.celebration.is_active() {
                    continue;
                }
                app.celebration.update();
            }
            BingoEvent::Resize => {
                let size = terminal.size()?;
                app.resize(size.width, size.height);
            }
            BingoEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.on_key(key)? == Control::Quit {
                    break;
                }
            }
            BingoEvent::Mouse(mouse) => app.on_mouse(mouse),
            BingoEvent::Timer(tick) => app.on_timer(tick),
        }
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn describe(index: usize, entry: &WordEntry) -> String {
    match entry.timer_seconds() {
        Some(secs) => format!("{index:>3}  {:<5}  {} ({secs}s)", entry.kind, entry.text),
        None => format!("{index:>3}  {:<5}  {}", entry.kind, entry.text),
    }
}

fn print_report<W: Write>(out: &mut W, verb: &str, report: &IngestReport) -> io::Result<()> {
    writeln!(out, "{verb} {} words", report.entries.len())?;
    for problem in &report.problems {
        writeln!(out, "  {problem}")?;
    }
    if report.dropped_blank > 0 {
        writeln!(out, "  skipped {} blank entries", report.dropped_blank)?;
    }
    Ok(())
}

fn run_words<W: Write>(
    action: WordsCommand,
    store: &mut dyn WordStore,
    default_timer_secs: u32,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    match action {
        WordsCommand::List => {
            let entries = store.list()?;
            if entries.is_empty() {
                writeln!(out, "no words stored")?;
            } else {
                let listing = entries
                    .iter()
                    .enumerate()
                    .map(|(i, e)| describe(i, e))
                    .join("\n");
                writeln!(out, "{listing}")?;
            }
        }
        WordsCommand::Add { text, kind, time } => {
            let text = text.trim();
            if text.is_empty() {
                return Err("word text must not be blank".into());
            }
            let entry = WordEntry::new(text, kind, time.or(Some(default_timer_secs)));
            let mut entries = store.list()?;
            writeln!(out, "added {}", describe(entries.len(), &entry))?;
            entries.push(entry);
            store.replace(entries)?;
        }
        WordsCommand::Remove { index } => {
            let mut entries = store.list()?;
            if index >= entries.len() {
                return Err(StoreError::IndexOutOfRange {
                    index,
                    len: entries.len(),
                }
                .into());
            }
            let removed = entries.remove(index);
            store.replace(entries)?;
            writeln!(out, "removed {}", removed.text)?;
        }
        WordsCommand::Import { file } => {
            let report = word_store::import_file(&file, default_timer_secs)?;
            print_report(out, "imported", &report)?;
            store.replace(report.entries)?;
        }
        WordsCommand::Export { file } => {
            let entries = store.list()?;
            word_store::export_file(&file, &entries)?;
            writeln!(out, "exported {} words to {}", entries.len(), file.display())?;
        }
        WordsCommand::Preset { name } => {
            let report = word_store::load_preset(&name, default_timer_secs)?;
            print_report(out, "loaded", &report)?;
            store.replace(report.entries)?;
        }
        WordsCommand::Presets => {
            for name in word_store::preset_names() {
                writeln!(out, "{name}")?;
            }
        }
    }
    Ok(())
}

use clacker::{
    app::{Action, App},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    corpus::BundledCorpus,
    engine::SessionEvent,
    logging,
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

/// timed typing sessions over an endless paragraph
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing test. Press enter to start, type the paragraph as it grows, and see words per minute and accuracy when the countdown runs out."
)]
pub struct Cli {
    /// number of seconds each session lasts
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// bundled corpus to draw sentences from
    #[clap(short = 'c', long, value_enum)]
    corpus: Option<BundledCorpus>,

    /// JSON corpus file to use instead of a bundled one
    #[clap(long)]
    corpus_file: Option<PathBuf>,

    /// minimum number of characters in a generated paragraph
    #[clap(long)]
    min_chars: Option<usize>,

    /// sentences per paragraph for chapter corpora
    #[clap(long)]
    sentences: Option<usize>,

    /// write the resulting settings back to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line values win over whatever the config file said
    fn apply_to(&self, config: &mut Config) {
        if let Some(seconds) = self.seconds {
            config.duration_secs = seconds;
        }
        if let Some(corpus) = self.corpus {
            config.corpus = corpus.to_string();
            config.corpus_file = None;
        }
        if let Some(path) = &self.corpus_file {
            config.corpus_file = Some(path.clone());
        }
        if let Some(min_chars) = self.min_chars {
            config.min_paragraph_chars = min_chars;
        }
        if let Some(sentences) = self.sentences {
            config.sentences_per_paragraph = sentences;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = AppDirs::log_dir().and_then(|dir| logging::init(&dir));

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply_to(&mut config);

    if cli.save_config {
        if let Err(err) = store.save(&config) {
            warn!(path = %store.path().display(), %err, "failed to save config");
        }
    }

    let mut app = App::new(config)?;
    info!(corpus = app.corpus_name(), "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let res = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Tick(id) => {
                app.handle_tick(id);
            }
            AppEvent::Key(key) => match app.handle_key(key) {
                Ok(Action::Quit) => break,
                Ok(Action::Continue) => {}
                Err(err) => warn!(%err, "key handling failed"),
            },
            AppEvent::Resize | AppEvent::Idle => {}
        }

        for event in app.drain_events() {
            match event {
                SessionEvent::Started { id } => runner.arm(id),
                SessionEvent::Finished { .. } => runner.disarm(),
                SessionEvent::Extended { .. } => {}
            }
        }
    }

    Ok(())
}

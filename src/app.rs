use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::engine::{Engine, SessionEvent, TickOutcome};
use crate::error::Result;
use crate::generator::ParagraphGenerator;
use crate::input::KeyInput;
use crate::session::{Phase, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Everything the terminal front end needs: the engine plus the settings it was built from
pub struct App {
    pub engine: Engine,
    pub config: Config,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let corpus = config.load_corpus()?;
        let generator = ParagraphGenerator::new(corpus, config.gen_config());
        let engine = Engine::new(generator, config.session_config());

        Ok(Self { engine, config })
    }

    pub fn corpus_name(&self) -> &str {
        &self.engine.generator().corpus().name
    }

    /// App-level keys first, then whatever is left goes to the typed buffer
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        if key.kind == KeyEventKind::Release {
            return Ok(Action::Continue);
        }

        match key.code {
            KeyCode::Esc => return Ok(Action::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Action::Quit)
            }
            KeyCode::Tab => {
                self.engine.start()?;
            }
            KeyCode::Enter if self.engine.phase() != Phase::Active => {
                self.engine.start()?;
            }
            _ => {
                self.engine.handle_input(KeyInput::from(key))?;
            }
        }

        Ok(Action::Continue)
    }

    pub fn handle_tick(&mut self, id: SessionId) -> TickOutcome {
        self.engine.tick(id)
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.engine.drain_events()
    }
}

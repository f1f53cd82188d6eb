use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::generator::ParagraphGenerator;
use crate::input::{self, KeyInput};
use crate::metrics::MetricsSnapshot;
use crate::session::{Phase, Segment, SessionConfig, SessionId, SessionState};

/// Notifications for the front end, drained after each handled event
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A session just started; the front end should take input focus
    Started { id: SessionId },
    Extended { id: SessionId, added_chars: usize },
    /// Countdown ran out; carries the frozen result
    Finished {
        id: SessionId,
        result: MetricsSnapshot,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Tick belonged to another session or arrived outside of Active
    Stale,
    Counted { seconds_remaining: u32 },
    Finished(MetricsSnapshot),
}

/// Read-only view of the running session
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub id: SessionId,
    pub phase: Phase,
    pub target_text: &'a str,
    pub typed_text: &'a str,
    pub seconds_remaining: u32,
    pub words_per_minute: f64,
    pub accuracy_percent: u8,
    pub group_label: Option<&'a str>,
}

/// The typing-session state machine
pub struct Engine<C: Clock = SystemClock> {
    generator: ParagraphGenerator,
    config: SessionConfig,
    state: SessionState,
    final_result: Option<MetricsSnapshot>,
    events: Vec<SessionEvent>,
    clock: C,
}

impl Engine {
    pub fn new(generator: ParagraphGenerator, config: SessionConfig) -> Self {
        Self::with_clock(generator, config, SystemClock)
    }
}

impl<C: Clock> Engine<C> {
    pub fn with_clock(generator: ParagraphGenerator, config: SessionConfig, clock: C) -> Self {
        Self {
            generator,
            config,
            state: SessionState::default(),
            final_result: None,
            events: Vec::new(),
            clock,
        }
    }

    /// Begin a fresh session, discarding whatever was running before.
    ///
    /// On a generation failure the previous session is left as it was.
    pub fn start(&mut self) -> Result<SessionId> {
        let paragraph = self.generator.generate()?;
        let id = self.state.id.next();
        let target_len = paragraph.text.chars().count();

        self.state = SessionState {
            id,
            phase: Phase::Active,
            target_text: paragraph.text,
            typed_text: String::new(),
            target_len,
            typed_len: 0,
            started_at: Some(self.clock.now()),
            seconds_remaining: self.config.duration_secs,
            segments: vec![Segment {
                start: 0,
                group: paragraph.group,
            }],
        };
        self.final_result = None;
        self.events.push(SessionEvent::Started { id });

        info!(
            session = %id,
            corpus = %self.generator.corpus().name,
            target_len,
            duration_secs = self.config.duration_secs,
            "session started"
        );

        Ok(id)
    }

    /// Count down one second of the session identified by `id`
    pub fn tick(&mut self, id: SessionId) -> TickOutcome {
        if id != self.state.id || self.state.phase != Phase::Active {
            debug!(tick = %id, current = %self.state.id, phase = %self.state.phase, "discarding stale tick");
            return TickOutcome::Stale;
        }

        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
        if self.state.seconds_remaining > 0 {
            return TickOutcome::Counted {
                seconds_remaining: self.state.seconds_remaining,
            };
        }

        let result = self.metrics();
        self.state.phase = Phase::Finished;
        self.state.clear_buffers();
        self.final_result = Some(result);
        self.events.push(SessionEvent::Finished { id, result });

        info!(
            session = %id,
            wpm = result.words_per_minute,
            accuracy = result.accuracy_percent,
            "session finished"
        );

        TickOutcome::Finished(result)
    }

    /// Route one key into the typed buffer. Returns whether the buffer changed.
    ///
    /// The edit is applied before the target is extended. If extension fails
    /// the key stays applied and the error is returned; the next keystroke
    /// retries the extension.
    pub fn handle_input(&mut self, key: KeyInput) -> Result<bool> {
        if !self.state.is_accepting_input() {
            return Ok(false);
        }

        if !input::apply(&mut self.state.typed_text, key) {
            return Ok(false);
        }

        match key {
            KeyInput::Char(_) => self.state.typed_len += 1,
            KeyInput::Delete => self.state.typed_len -= 1,
            KeyInput::Ignored => {}
        }

        self.extend_if_needed()?;
        Ok(true)
    }

    /// Append another paragraph once the typed text reaches the last target char.
    ///
    /// Fires at most once per crossing: every extension grows the target by at
    /// least two chars, which moves the threshold past the cursor.
    pub fn extend_if_needed(&mut self) -> Result<bool> {
        if self.state.phase != Phase::Active || !self.state.near_end_of_target() {
            return Ok(false);
        }

        let paragraph = self.generator.generate()?;
        let added_chars = paragraph.text.chars().count() + 1;

        self.state.target_text.push(' ');
        self.state.target_text.push_str(&paragraph.text);
        self.state.segments.push(Segment {
            start: self.state.target_len + 1,
            group: paragraph.group,
        });
        self.state.target_len += added_chars;

        let id = self.state.id;
        self.events.push(SessionEvent::Extended { id, added_chars });
        debug!(session = %id, added_chars, target_len = self.state.target_len, "extended target text");

        Ok(true)
    }

    /// Live metrics computed from the current buffers
    pub fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot::measure(
            &self.state.typed_text,
            &self.state.target_text,
            self.state.started_at,
            self.clock.now(),
        )
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let metrics = self.metrics();

        Snapshot {
            id: self.state.id,
            phase: self.state.phase,
            target_text: &self.state.target_text,
            typed_text: &self.state.typed_text,
            seconds_remaining: self.state.seconds_remaining,
            words_per_minute: metrics.words_per_minute,
            accuracy_percent: metrics.accuracy_percent,
            group_label: self.state.group_label(),
        }
    }

    /// Result of the last finished session, kept until the next start
    pub fn final_result(&self) -> Option<MetricsSnapshot> {
        self.final_result
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn session_id(&self) -> SessionId {
        self.state.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn generator(&self) -> &ParagraphGenerator {
        &self.generator
    }
}

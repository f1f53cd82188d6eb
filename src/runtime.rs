use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::session::SessionId;

pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// One countdown second elapsed for the given session
    Tick(SessionId),
    /// Nothing arrived within the poll interval
    Idle,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(COUNTDOWN_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

#[derive(Clone, Copy, Debug)]
struct Countdown {
    session: SessionId,
    deadline: Instant,
}

/// Merges input events with the countdown of the current session.
///
/// At most one countdown is armed at a time; arming a new session replaces
/// the schedule of the previous one.
pub struct Runner<E: AppEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    countdown: Option<Countdown>,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            countdown: None,
        }
    }

    /// Start ticking for `session`, one interval from now
    pub fn arm(&mut self, session: SessionId) {
        self.countdown = Some(Countdown {
            session,
            deadline: Instant::now() + self.ticker.interval(),
        });
    }

    pub fn disarm(&mut self) {
        self.countdown = None;
    }

    pub fn armed_for(&self) -> Option<SessionId> {
        self.countdown.map(|c| c.session)
    }

    /// Blocks until the next event or countdown deadline
    pub fn step(&mut self) -> AppEvent {
        let Some(countdown) = self.countdown else {
            return match self.event_source.recv_timeout(IDLE_POLL_INTERVAL) {
                Ok(ev) => ev,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    AppEvent::Idle
                }
            };
        };

        let wait = countdown.deadline.saturating_duration_since(Instant::now());
        match self.event_source.recv_timeout(wait) {
            Ok(ev) => ev,
            Err(err) => {
                if err == RecvTimeoutError::Disconnected {
                    std::thread::sleep(wait);
                }
                self.countdown = Some(Countdown {
                    session: countdown.session,
                    deadline: countdown.deadline + self.ticker.interval(),
                });
                AppEvent::Tick(countdown.session)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn step_returns_idle_when_disarmed() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        assert_eq!(runner.step(), AppEvent::Idle);
        assert_eq!(runner.armed_for(), None);
    }

    #[test]
    fn step_returns_tick_for_armed_session() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        runner.arm(SessionId(3));
        assert_eq!(runner.step(), AppEvent::Tick(SessionId(3)));
        assert_eq!(runner.step(), AppEvent::Tick(SessionId(3)));
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        tx.send(AppEvent::Resize).unwrap();
        tx.send(AppEvent::Key(key)).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(50));
        let mut runner = Runner::new(es, ticker);
        runner.arm(SessionId(1));

        assert_eq!(runner.step(), AppEvent::Resize);
        assert_eq!(runner.step(), AppEvent::Key(key));
    }

    #[test]
    fn rearming_replaces_previous_session() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        runner.arm(SessionId(1));
        runner.arm(SessionId(2));
        assert_eq!(runner.armed_for(), Some(SessionId(2)));
        assert_eq!(runner.step(), AppEvent::Tick(SessionId(2)));

        runner.disarm();
        assert_eq!(runner.step(), AppEvent::Idle);
    }

    #[test]
    fn default_ticker_is_one_second() {
        assert_eq!(FixedTicker::default().interval(), Duration::from_secs(1));
    }
}

use std::fmt;
use std::time::Instant;

pub const DEFAULT_DURATION_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub duration_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Phase {
    #[default]
    Idle,
    Active,
    Finished,
}

/// Identity of a started session. Increases with every start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(self) -> Self {
        SessionId(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A generated paragraph's position inside the target buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: usize,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub id: SessionId,
    pub phase: Phase,
    pub target_text: String,
    pub typed_text: String,
    // Char counts of the buffers above
    pub target_len: usize,
    pub typed_len: usize,
    pub started_at: Option<Instant>,
    pub seconds_remaining: u32,
    pub segments: Vec<Segment>,
}

impl SessionState {
    pub fn is_accepting_input(&self) -> bool {
        self.phase == Phase::Active && self.seconds_remaining > 0
    }

    pub fn near_end_of_target(&self) -> bool {
        self.typed_len + 1 >= self.target_len
    }

    /// Group label of the paragraph the typing cursor is currently in
    pub fn group_label(&self) -> Option<&str> {
        self.segments
            .iter()
            .rev()
            .find(|segment| segment.start <= self.typed_len)
            .and_then(|segment| segment.group.as_deref())
    }

    pub fn clear_buffers(&mut self) {
        self.target_text.clear();
        self.typed_text.clear();
        self.target_len = 0;
        self.typed_len = 0;
        self.segments.clear();
    }
}

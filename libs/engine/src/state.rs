use std::fmt;

use crate::scanner::BlockRange;

/// Where the indexing loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Connecting,
    CatchingUp,
    Idle,
    ErrorRecovery,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Connecting => "CONNECTING",
            State::CatchingUp => "CATCHING_UP",
            State::Idle => "IDLE",
            State::ErrorRecovery => "ERROR_RECOVERY",
        };
        f.write_str(name)
    }
}

/// Outcome of a single poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cursor is past the head; nothing to scan.
    Idle { head: u64 },
    /// An interval was scanned and persisted.
    Indexed { range: BlockRange, head: u64, events: u64 },
}

impl Step {
    pub fn state(&self) -> State {
        match self {
            Step::Idle { .. } => State::Idle,
            Step::Indexed { .. } => State::CatchingUp,
        }
    }
}

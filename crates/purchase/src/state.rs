//! Confirmation polling state machine.

use domain::SettlementStatus;

/// The state of a confirmation poll.
///
/// State transitions:
/// ```text
/// Doing ──┬──► Done       (receipt's first log entry is "mined")
///         ├──► Failed     (receipt query reported an error)
///         └──► Exhausted  (attempt budget ran out)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PollState {
    /// Still waiting for a definitive answer.
    #[default]
    Doing,

    /// The transfer was observed mined (terminal).
    Done,

    /// The ledger reported an error while checking (terminal).
    Failed,

    /// The attempt budget ran out without an answer (terminal).
    ///
    /// Reported to callers as `doing`; not a failure.
    Exhausted,
}

impl PollState {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Doing)
    }

    /// Maps the poll state to the caller-facing settlement status.
    pub fn settlement(&self) -> SettlementStatus {
        match self {
            PollState::Done => SettlementStatus::Done,
            PollState::Failed => SettlementStatus::Fail,
            PollState::Doing | PollState::Exhausted => SettlementStatus::Doing,
        }
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PollState::Doing => "Doing",
            PollState::Done => "Done",
            PollState::Failed => "Failed",
            PollState::Exhausted => "Exhausted",
        }
    }
}

impl std::fmt::Display for PollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

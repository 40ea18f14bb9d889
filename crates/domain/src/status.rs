//! Settlement status reported after confirmation polling.

use serde::{Deserialize, Serialize};

/// The tri-state outcome of polling the ledger for a transfer's confirmation.
///
/// `Doing` is a valid terminal report, not a failure: it means the polling
/// budget ran out before the ledger gave a definitive answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// The transfer was observed mined on the ledger.
    Done,

    /// The ledger reported an error while checking the transfer.
    Fail,

    /// Settlement undetermined as of the last poll.
    Doing,
}

impl SettlementStatus {
    /// Returns the status name as the caller-facing string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Done => "done",
            SettlementStatus::Fail => "fail",
            SettlementStatus::Doing => "doing",
        }
    }
}

impl std::fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

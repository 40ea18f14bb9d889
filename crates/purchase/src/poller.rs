//! Bounded-retry confirmation polling.

use std::time::Duration;

use common::TransferId;
use domain::SettlementStatus;

use crate::services::ledger::LedgerClient;
use crate::state::PollState;

/// Polling budget: a fixed wait before each attempt and a fixed maximum
/// number of attempts.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Wait before each receipt query.
    pub interval: Duration,
    /// Maximum number of receipt queries.
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 3,
        }
    }
}

/// Determines, within a bounded number of attempts, whether a submitted
/// transfer has been accepted by the ledger.
///
/// This is a synchronous suspension point for the calling invocation: it
/// blocks for up to `max_attempts * interval` plus network latency.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationPoller {
    config: PollerConfig,
}

impl ConfirmationPoller {
    /// Creates a poller with the given budget.
    pub fn new(config: PollerConfig) -> Self {
        Self { config }
    }

    /// Polls the ledger for the transfer's confirmation.
    ///
    /// Each attempt waits `interval`, then queries the receipt:
    /// - a receipt query error ends the loop immediately with `fail`;
    /// - an absent receipt or one with no log entries consumes the attempt;
    /// - a first log entry of type `mined` ends the loop with `done`.
    ///
    /// An exhausted budget reports `doing`, a valid terminal answer
    /// meaning "settlement undetermined as of now", never an error.
    #[tracing::instrument(skip(self, ledger), fields(transfer_id = %transfer_id))]
    pub async fn poll<L: LedgerClient>(
        &self,
        ledger: &L,
        transfer_id: &TransferId,
    ) -> SettlementStatus {
        let mut state = PollState::Doing;

        for attempt in 1..=self.config.max_attempts {
            tokio::time::sleep(self.config.interval).await;
            metrics::counter!("confirmation_poll_attempts").increment(1);

            match ledger.get_receipt(transfer_id).await {
                Err(e) => {
                    tracing::warn!(%attempt, error = %e, "receipt query failed");
                    state = PollState::Failed;
                    break;
                }
                Ok(Some(receipt)) if receipt.is_mined() => {
                    tracing::info!(%attempt, "transfer mined");
                    state = PollState::Done;
                    break;
                }
                Ok(_) => {
                    tracing::debug!(%attempt, "no confirmation yet");
                }
            }
        }

        if !state.is_terminal() {
            state = PollState::Exhausted;
        }

        state.settlement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ledger::{InMemoryLedger, ReceiptOutcome};

    fn fast_poller() -> ConfirmationPoller {
        ConfirmationPoller::new(PollerConfig {
            interval: Duration::from_millis(1),
            max_attempts: 3,
        })
    }

    #[tokio::test]
    async fn mined_on_first_attempt_returns_done() {
        let ledger = InMemoryLedger::new();
        ledger.script_receipts(vec![ReceiptOutcome::Mined]).await;

        let status = fast_poller()
            .poll(&ledger, &TransferId::new("TX-0001"))
            .await;

        assert_eq!(status, SettlementStatus::Done);
        assert_eq!(ledger.receipt_query_count().await, 1);
    }

    #[tokio::test]
    async fn mined_after_pending_attempts_returns_done() {
        let ledger = InMemoryLedger::new();
        ledger
            .script_receipts(vec![
                ReceiptOutcome::Pending,
                ReceiptOutcome::Pending,
                ReceiptOutcome::Mined,
            ])
            .await;

        let status = fast_poller()
            .poll(&ledger, &TransferId::new("TX-0001"))
            .await;

        assert_eq!(status, SettlementStatus::Done);
        assert_eq!(ledger.receipt_query_count().await, 3);
    }

    #[tokio::test]
    async fn exhausted_budget_returns_doing() {
        let ledger = InMemoryLedger::new();
        ledger
            .script_receipts(vec![
                ReceiptOutcome::Pending,
                ReceiptOutcome::Pending,
                ReceiptOutcome::Pending,
            ])
            .await;

        let status = fast_poller()
            .poll(&ledger, &TransferId::new("TX-0001"))
            .await;

        assert_eq!(status, SettlementStatus::Doing);
        // Exactly max_attempts queries, no more.
        assert_eq!(ledger.receipt_query_count().await, 3);
    }

    #[tokio::test]
    async fn first_error_ends_the_loop_with_fail() {
        let ledger = InMemoryLedger::new();
        ledger
            .script_receipts(vec![
                ReceiptOutcome::Pending,
                ReceiptOutcome::Error("node down".to_string()),
                ReceiptOutcome::Mined,
            ])
            .await;

        let status = fast_poller()
            .poll(&ledger, &TransferId::new("TX-0001"))
            .await;

        assert_eq!(status, SettlementStatus::Fail);
        assert_eq!(ledger.receipt_query_count().await, 2);
    }

    #[tokio::test]
    async fn default_budget_is_three_one_second_attempts() {
        let config = PollerConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.interval, Duration::from_secs(1));
    }
}

//! Ledger client trait, HTTP adapter, and in-memory implementation.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use common::{EthAddress, TransferId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{PurchaseError, Result};

/// Configuration for the ledger gateway.
///
/// Built once at startup and passed by reference into constructors; the
/// credential is an opaque token attached to every request, standing in
/// for the gateway's signed-request scheme.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Gateway host, without scheme.
    pub host: String,
    /// Opaque credential sent with every call.
    pub credential: String,
    /// Destination of burn transfers.
    pub burn_address: EthAddress,
}

impl LedgerConfig {
    /// Creates a config with the standard null burn address.
    pub fn new(host: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            credential: credential.into(),
            burn_address: EthAddress::zero(),
        }
    }
}

/// A log entry on a transfer receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    /// Entry type; `"mined"` marks confirmation.
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl ReceiptLog {
    /// The entry type marking a confirmed transfer.
    pub const MINED: &'static str = "mined";

    /// Creates a `mined` log entry.
    pub fn mined() -> Self {
        Self {
            entry_type: Self::MINED.to_string(),
        }
    }
}

/// A transfer receipt returned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Log entries; empty until the ledger has processed the transfer.
    pub logs: Vec<ReceiptLog>,
}

impl TransferReceipt {
    /// Returns true if the first log entry marks the transfer as mined.
    pub fn is_mined(&self) -> bool {
        self.logs
            .first()
            .is_some_and(|log| log.entry_type == ReceiptLog::MINED)
    }
}

/// Trait for ledger value-transfer operations.
///
/// Stateless; performs no retries of its own.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submits a value transfer. The amount is a 64-hex-digit zero-padded
    /// unsigned integer. Fails with
    /// [`PurchaseError::LedgerTransaction`] when the response body carries
    /// a non-empty error field.
    async fn submit_transfer(
        &self,
        from: &EthAddress,
        to: &EthAddress,
        amount_hex: &str,
    ) -> Result<TransferId>;

    /// Queries the receipt for a previously submitted transfer. `None`
    /// until the ledger knows about it.
    async fn get_receipt(&self, transfer_id: &TransferId) -> Result<Option<TransferReceipt>>;
}

#[derive(Serialize)]
struct TransferPayload<'a> {
    from_user_eth_address: &'a str,
    to_user_eth_address: &'a str,
    tip_value: &'a str,
}

#[derive(Serialize)]
struct ReceiptPayload<'a> {
    transaction_hash: &'a str,
}

#[derive(Deserialize)]
struct TransferResponse {
    result: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ReceiptResponse {
    result: Option<TransferReceipt>,
    error: Option<String>,
}

/// HTTP adapter talking to the ledger gateway over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    config: LedgerConfig,
    client: reqwest::Client,
}

impl HttpLedgerClient {
    /// Creates a new client for the given gateway config.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        payload: &Req,
    ) -> Result<Resp> {
        let url = format!("https://{}{}", self.config.host, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.credential)
            .json(payload)
            .send()
            .await
            .map_err(|e| PurchaseError::LedgerUnavailable(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| PurchaseError::LedgerUnavailable(e.to_string()))
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn submit_transfer(
        &self,
        from: &EthAddress,
        to: &EthAddress,
        amount_hex: &str,
    ) -> Result<TransferId> {
        let payload = TransferPayload {
            from_user_eth_address: from.as_str(),
            // The gateway expects the destination without its 0x prefix.
            to_user_eth_address: to.without_prefix(),
            tip_value: amount_hex,
        };

        let response: TransferResponse = self.post("/wallet/tip", &payload).await?;

        if let Some(error) = response.error.filter(|e| !e.is_empty()) {
            return Err(PurchaseError::LedgerTransaction(error));
        }

        let result = response.result.ok_or_else(|| {
            PurchaseError::LedgerUnavailable("transfer response missing result".to_string())
        })?;
        // Some gateway deployments wrap the hash in literal quotes.
        Ok(TransferId::new(result.trim_matches('"')))
    }

    async fn get_receipt(&self, transfer_id: &TransferId) -> Result<Option<TransferReceipt>> {
        let payload = ReceiptPayload {
            transaction_hash: transfer_id.as_str(),
        };

        let response: ReceiptResponse = self.post("/transaction/receipt", &payload).await?;

        if let Some(error) = response.error.filter(|e| !e.is_empty()) {
            return Err(PurchaseError::LedgerTransaction(error));
        }

        Ok(response.result)
    }
}

/// A transfer recorded by the in-memory ledger.
#[derive(Debug, Clone)]
pub struct SubmittedTransfer {
    pub transfer_id: TransferId,
    pub from: EthAddress,
    pub to: EthAddress,
    pub amount_hex: String,
}

/// Scripted outcome for one receipt query against the in-memory ledger.
#[derive(Debug, Clone)]
pub enum ReceiptOutcome {
    /// No receipt yet (or a receipt with no logs).
    Pending,
    /// Receipt whose first log entry is `mined`.
    Mined,
    /// The receipt query itself reports an error.
    Error(String),
}

#[derive(Debug, Default)]
struct InMemoryLedgerState {
    transfers: Vec<SubmittedTransfer>,
    next_id: u32,
    /// 1-based index of the submission that should fail, if any.
    fail_on_submit: Option<u32>,
    /// Receipt outcomes consumed one per query; empty means `Mined`.
    receipts: VecDeque<ReceiptOutcome>,
    receipt_queries: u32,
}

/// In-memory ledger for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<RwLock<InMemoryLedgerState>>,
}

impl InMemoryLedger {
    /// Creates a new in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the nth submission (1-based) fail with a ledger error.
    pub async fn set_fail_on_submit(&self, nth: u32) {
        self.state.write().await.fail_on_submit = Some(nth);
    }

    /// Scripts the outcomes of upcoming receipt queries, consumed in order.
    /// When the script runs out, queries report `Mined`.
    pub async fn script_receipts(&self, outcomes: Vec<ReceiptOutcome>) {
        self.state.write().await.receipts = outcomes.into();
    }

    /// Returns the number of transfers submitted.
    pub async fn submitted_count(&self) -> usize {
        self.state.read().await.transfers.len()
    }

    /// Returns the nth submitted transfer (0-based).
    pub async fn transfer(&self, index: usize) -> Option<SubmittedTransfer> {
        self.state.read().await.transfers.get(index).cloned()
    }

    /// Returns how many receipt queries have been made.
    pub async fn receipt_query_count(&self) -> u32 {
        self.state.read().await.receipt_queries
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn submit_transfer(
        &self,
        from: &EthAddress,
        to: &EthAddress,
        amount_hex: &str,
    ) -> Result<TransferId> {
        let mut state = self.state.write().await;

        let nth = state.transfers.len() as u32 + 1;
        if state.fail_on_submit == Some(nth) {
            return Err(PurchaseError::LedgerTransaction(
                "insufficient balance".to_string(),
            ));
        }

        state.next_id += 1;
        let transfer_id = TransferId::new(format!("TX-{:04}", state.next_id));
        state.transfers.push(SubmittedTransfer {
            transfer_id: transfer_id.clone(),
            from: from.clone(),
            to: to.clone(),
            amount_hex: amount_hex.to_string(),
        });

        Ok(transfer_id)
    }

    async fn get_receipt(&self, _transfer_id: &TransferId) -> Result<Option<TransferReceipt>> {
        let mut state = self.state.write().await;
        state.receipt_queries += 1;

        match state.receipts.pop_front() {
            None | Some(ReceiptOutcome::Mined) => Ok(Some(TransferReceipt {
                logs: vec![ReceiptLog::mined()],
            })),
            Some(ReceiptOutcome::Pending) => Ok(None),
            Some(ReceiptOutcome::Error(message)) => {
                Err(PurchaseError::LedgerTransaction(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_is_mined_checks_first_log_only() {
        let mined = TransferReceipt {
            logs: vec![ReceiptLog::mined()],
        };
        assert!(mined.is_mined());

        let empty = TransferReceipt { logs: vec![] };
        assert!(!empty.is_mined());

        let other_first = TransferReceipt {
            logs: vec![
                ReceiptLog {
                    entry_type: "pending".to_string(),
                },
                ReceiptLog::mined(),
            ],
        };
        assert!(!other_first.is_mined());
    }

    #[test]
    fn receipt_log_type_field_name() {
        let json = serde_json::to_string(&ReceiptLog::mined()).unwrap();
        assert_eq!(json, "{\"type\":\"mined\"}");
    }

    #[tokio::test]
    async fn submit_records_transfer_and_mints_sequential_ids() {
        let ledger = InMemoryLedger::new();
        let from = EthAddress::new("0xaaa");
        let to = EthAddress::new("0xbbb");

        let id1 = ledger.submit_transfer(&from, &to, "00ff").await.unwrap();
        let id2 = ledger.submit_transfer(&from, &to, "00aa").await.unwrap();

        assert_eq!(id1, TransferId::new("TX-0001"));
        assert_eq!(id2, TransferId::new("TX-0002"));
        assert_eq!(ledger.submitted_count().await, 2);
        assert_eq!(ledger.transfer(0).await.unwrap().amount_hex, "00ff");
    }

    #[tokio::test]
    async fn fail_on_submit_targets_one_submission() {
        let ledger = InMemoryLedger::new();
        let from = EthAddress::new("0xaaa");
        let to = EthAddress::new("0xbbb");
        ledger.set_fail_on_submit(2).await;

        assert!(ledger.submit_transfer(&from, &to, "01").await.is_ok());
        let err = ledger.submit_transfer(&from, &to, "02").await.unwrap_err();
        assert!(matches!(err, PurchaseError::LedgerTransaction(_)));
        assert_eq!(ledger.submitted_count().await, 1);
    }

    #[tokio::test]
    async fn scripted_receipts_are_consumed_in_order() {
        let ledger = InMemoryLedger::new();
        let id = TransferId::new("TX-0001");
        ledger
            .script_receipts(vec![ReceiptOutcome::Pending, ReceiptOutcome::Mined])
            .await;

        assert!(ledger.get_receipt(&id).await.unwrap().is_none());
        assert!(ledger.get_receipt(&id).await.unwrap().unwrap().is_mined());
        // Script exhausted: defaults to mined.
        assert!(ledger.get_receipt(&id).await.unwrap().unwrap().is_mined());
        assert_eq!(ledger.receipt_query_count().await, 3);
    }

    #[tokio::test]
    async fn concurrent_submissions_are_all_recorded() {
        let ledger = InMemoryLedger::new();

        let mut handles = Vec::new();
        for i in 0..8u32 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                let from = EthAddress::new(format!("0xaa{i:02}"));
                ledger.submit_transfer(&from, &EthAddress::zero(), "01").await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(ledger.submitted_count().await, 8);
    }

    #[tokio::test]
    async fn scripted_error_surfaces_as_ledger_transaction() {
        let ledger = InMemoryLedger::new();
        let id = TransferId::new("TX-0001");
        ledger
            .script_receipts(vec![ReceiptOutcome::Error("node down".to_string())])
            .await;

        let err = ledger.get_receipt(&id).await.unwrap_err();
        assert!(matches!(err, PurchaseError::LedgerTransaction(_)));
    }
}

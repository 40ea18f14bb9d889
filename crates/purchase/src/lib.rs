//! Purchase orchestration for the paid-article marketplace.
//!
//! Drives the end-to-end purchase saga for one validated request:
//! 1. Gate on article state (priced, not self-owned)
//! 2. Resolve the seller's ledger address
//! 3. Submit the purchase transfer (9/10 of the price)
//! 4. Persist the durable purchase record (conditional on absence)
//! 5. Submit the burn transfer (1/10 of the price, to the null address)
//! 6. Poll the ledger for confirmation under a bounded budget
//!
//! Steps are strictly ordered and non-transactional: a later failure never
//! undoes an earlier transfer. The record persisted after the purchase
//! transfer is the recovery anchor for partial failures.

pub mod error;
pub mod orchestrator;
pub mod poller;
pub mod services;
pub mod state;

pub use error::PurchaseError;
pub use orchestrator::PurchaseOrchestrator;
pub use poller::{ConfirmationPoller, PollerConfig};
pub use services::{
    AddressDirectory, HttpLedgerClient, InMemoryDirectory, InMemoryLedger, LedgerClient,
    LedgerConfig, ReceiptLog, ReceiptOutcome, SubmittedTransfer, TransferReceipt,
};
pub use state::PollState;

//! External service seams: the ledger gateway and the identity directory.

pub mod directory;
pub mod ledger;

pub use directory::{AddressDirectory, InMemoryDirectory};
pub use ledger::{
    HttpLedgerClient, InMemoryLedger, LedgerClient, LedgerConfig, ReceiptLog, ReceiptOutcome,
    SubmittedTransfer, TransferReceipt,
};

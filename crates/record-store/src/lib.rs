//! Persistent store contracts for the paid-article marketplace.
//!
//! Defines the durable [`PurchaseRecord`], the read-only [`ArticleStore`],
//! and the [`PurchaseStore`] whose conditional-create primitive is the
//! system's sole idempotency and concurrency-control mechanism, plus an
//! in-memory implementation used by tests and the default server wiring.

pub mod error;
pub mod memory;
pub mod record;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryMarketStore;
pub use record::PurchaseRecord;
pub use store::{ArticleStore, PurchaseStore};

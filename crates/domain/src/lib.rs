//! Domain model for the paid-article marketplace.
//!
//! Defines the article and price-history records the purchase flow reads,
//! the wei-denominated [`TokenAmount`] with its fixed-width hex encoding,
//! the tri-state [`SettlementStatus`], and request validation.

pub mod amount;
pub mod article;
pub mod error;
pub mod request;
pub mod status;

pub use amount::TokenAmount;
pub use article::{Article, ArticleStatus, PriceHistoryEntry, latest_history_match};
pub use error::DomainError;
pub use request::{PurchaseRequest, validate_price, validate_request};
pub use status::SettlementStatus;

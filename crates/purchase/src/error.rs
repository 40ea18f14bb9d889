//! Purchase orchestration error types.

use common::{ArticleId, UserId};
use domain::DomainError;
use record_store::StoreError;
use thiserror::Error;

/// Errors that can occur during purchase orchestration.
///
/// Recoverability differs by where in the saga an error surfaces: anything
/// before the record is created leaves no durable trace, while a burn
/// failure leaves a record missing its burn transfer ID on purpose.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// The article does not exist.
    #[error("Article not found: {0}")]
    ArticleNotFound(ArticleId),

    /// The article has no price and is not for sale.
    #[error("Article is not for sale: {0}")]
    NotPurchasable(ArticleId),

    /// The buyer owns the article.
    #[error("Can not purchase own article")]
    SelfPurchase,

    /// The identity directory did not return exactly one ledger address
    /// for the user. Fatal; every seller is assumed to have one address.
    #[error("No registered ledger address for user {0}")]
    AddressNotFound(UserId),

    /// A purchase record already exists for this (article, buyer) pair.
    /// The idempotency boundary: the retried request must not resubmit.
    #[error("Article already purchased: {article_id} by {user_id}")]
    DuplicatePurchase {
        article_id: ArticleId,
        user_id: UserId,
    },

    /// The ledger explicitly reported a transaction failure.
    #[error("Ledger transaction error: {0}")]
    LedgerTransaction(String),

    /// The ledger gateway could not be reached.
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// Request validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    /// Record store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience type alias for purchase results.
pub type Result<T> = std::result::Result<T, PurchaseError>;

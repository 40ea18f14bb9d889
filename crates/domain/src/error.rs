//! Domain validation error types.

use common::ArticleId;
use thiserror::Error;

use crate::amount::TokenAmount;

/// Errors raised while validating a purchase request against current state.
///
/// All of these are rejected before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Price is zero or would round away under the 9/10 split.
    #[error("Price must be a positive token amount")]
    NonPositivePrice,

    /// Price is not an exact multiple of 10^18 wei.
    #[error("Decimal value is not allowed")]
    FractionalTokenAmount,

    /// Requested price does not match the article's current price.
    #[error("Price {requested} does not match current article price {current}")]
    PriceMismatch {
        requested: TokenAmount,
        current: TokenAmount,
    },

    /// The article does not exist.
    #[error("Article not found: {0}")]
    ArticleNotFound(ArticleId),

    /// The article exists but is not publicly published.
    #[error("Article is not published: {0}")]
    NotPublished(ArticleId),

    /// A hex amount string was not a valid 64-digit unsigned encoding.
    #[error("Invalid amount encoding: {0}")]
    InvalidAmountEncoding(String),
}

//! Article and price-history records.

use common::{ArticleId, UserId};
use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;

/// Publication state of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Publicly visible and purchasable (if priced).
    Public,

    /// Not yet published.
    Draft,
}

/// An article as read by the purchase flow.
///
/// Immutable here except that `price` may change over time through a
/// separate history mechanism; this flow only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// The article's key.
    pub article_id: ArticleId,

    /// The owning (selling) user.
    pub user_id: UserId,

    /// Title, snapshotted into purchase records.
    pub title: String,

    /// Publication state.
    pub status: ArticleStatus,

    /// Current price; `None` means the article is not for sale.
    pub price: Option<TokenAmount>,
}

impl Article {
    /// Returns true if the article is publicly published.
    pub fn is_public(&self) -> bool {
        self.status == ArticleStatus::Public
    }

    /// Returns true if the given user owns this article.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

/// One entry in an article's price history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    /// Price recorded at this point; entries without a price are skipped
    /// when resolving the audit pointer.
    pub price: Option<TokenAmount>,

    /// Unix seconds at which this entry was written.
    pub created_at: i64,
}

/// Resolves the audit pointer stored on a purchase record: the `created_at`
/// of the newest history entry whose recorded price equals the article's
/// current price. `None` when no entry matches.
///
/// `history` must be ordered newest first, as the store returns it.
pub fn latest_history_match(history: &[PriceHistoryEntry], current: TokenAmount) -> Option<i64> {
    history
        .iter()
        .find(|entry| entry.price == Some(current))
        .map(|entry| entry.created_at)
}

//! The durable purchase record.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use common::{ArticleId, TransferId, UserId};
use domain::{Article, SettlementStatus, TokenAmount};
use serde::{Deserialize, Serialize};

/// The durable artifact of one buyer's purchase of one article.
///
/// Keyed by (`article_id`, `user_id`), where `user_id` is the buyer, not
/// the seller. Created
/// only after the purchase transfer has been accepted by the ledger;
/// `burn_transfer_id` and `status` are filled in by later independent
/// updates, so a record can be partially complete between those steps.
/// That partial record is the recovery anchor when a later step fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// The purchased article.
    pub article_id: ArticleId,

    /// The buying user (key component).
    pub user_id: UserId,

    /// The selling user.
    pub seller_id: UserId,

    /// Title snapshot taken at purchase time.
    pub article_title: String,

    /// The ledger transfer moving value from buyer to seller.
    pub purchase_transfer_id: TransferId,

    /// The burn transfer; absent until the burn step succeeds.
    pub burn_transfer_id: Option<TransferId>,

    /// Price paid, in wei.
    pub price: TokenAmount,

    /// `created_at` of the price-history entry matching the paid price,
    /// kept for audit/reconciliation; never used for control flow.
    pub history_created_at: Option<i64>,

    /// Unix seconds at which the record was created.
    pub created_at: i64,

    /// Monotonically increasing sort key for ordering purchases.
    pub sort_key: u64,

    /// Settlement status; set only after confirmation polling completes.
    pub status: Option<SettlementStatus>,
}

impl PurchaseRecord {
    /// Creates a record for an accepted purchase transfer.
    ///
    /// Snapshots the seller and title from the article as it was read at
    /// the start of the invocation.
    pub fn new(
        article: &Article,
        buyer: UserId,
        purchase_transfer_id: TransferId,
        price: TokenAmount,
        history_created_at: Option<i64>,
    ) -> Self {
        Self {
            article_id: article.article_id.clone(),
            user_id: buyer,
            seller_id: article.user_id.clone(),
            article_title: article.title.clone(),
            purchase_transfer_id,
            burn_transfer_id: None,
            price,
            history_created_at,
            created_at: Utc::now().timestamp(),
            sort_key: generate_sort_key(),
            status: None,
        }
    }
}

/// Generates a monotonically increasing sort key.
///
/// Based on epoch microseconds, bumped past the previous key when two
/// records are minted within the same microsecond.
pub fn generate_sort_key() -> u64 {
    static LAST: AtomicU64 = AtomicU64::new(0);

    let now = Utc::now().timestamp_micros().max(0) as u64;
    let mut key = now;
    let _ = LAST.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        key = now.max(last + 1);
        Some(key)
    });
    key
}

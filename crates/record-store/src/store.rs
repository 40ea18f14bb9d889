//! Store traits: read-only article access and the purchase record store.

use async_trait::async_trait;
use common::{ArticleId, TransferId, UserId};
use domain::{Article, PriceHistoryEntry, SettlementStatus};

use crate::error::Result;
use crate::record::PurchaseRecord;

/// Read-only access to articles and their price history.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Loads an article by ID.
    async fn get_article(&self, article_id: &ArticleId) -> Result<Option<Article>>;

    /// Returns the article's price history, newest first.
    async fn get_price_history(&self, article_id: &ArticleId) -> Result<Vec<PriceHistoryEntry>>;
}

/// Keyed store of purchase records supporting an idempotent
/// insert-if-absent and field-level updates.
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    /// Inserts a record conditional on no record existing for the same
    /// (article, buyer) key.
    ///
    /// Fails with [`StoreError::DuplicatePurchase`](crate::StoreError)
    /// when the key is taken. Concurrent attempts for the same key race on
    /// this atomic conditional write and exactly one succeeds.
    async fn create_if_absent(&self, record: PurchaseRecord) -> Result<()>;

    /// Attaches the burn transfer ID to an existing record.
    async fn set_burn_transfer_id(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
        transfer_id: TransferId,
    ) -> Result<()>;

    /// Sets the settlement status on an existing record.
    async fn set_status(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
        status: SettlementStatus,
    ) -> Result<()>;

    /// Loads a purchase record by its (article, buyer) key.
    async fn get_purchase(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
    ) -> Result<Option<PurchaseRecord>>;
}

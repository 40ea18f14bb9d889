use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{ArticleId, TransferId, UserId};
use domain::{Article, PriceHistoryEntry, SettlementStatus};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::record::PurchaseRecord;
use crate::store::{ArticleStore, PurchaseStore};

#[derive(Debug, Default)]
struct Inner {
    articles: HashMap<ArticleId, Article>,
    /// Per-article history, newest first.
    history: HashMap<ArticleId, Vec<PriceHistoryEntry>>,
    purchases: HashMap<(ArticleId, UserId), PurchaseRecord>,
}

/// In-memory market store for testing and the default server wiring.
///
/// Holds articles, price history, and purchase records behind a single
/// lock; the conditional create takes the write lock for the whole
/// check-then-insert, which is what makes it atomic.
#[derive(Clone, Default)]
pub struct InMemoryMarketStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryMarketStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an article.
    pub async fn put_article(&self, article: Article) {
        let mut inner = self.inner.write().await;
        inner.articles.insert(article.article_id.clone(), article);
    }

    /// Prepends a price-history entry (the newest entry comes first).
    pub async fn push_price_history(&self, article_id: &ArticleId, entry: PriceHistoryEntry) {
        let mut inner = self.inner.write().await;
        inner
            .history
            .entry(article_id.clone())
            .or_default()
            .insert(0, entry);
    }

    /// Returns the total number of purchase records stored.
    pub async fn purchase_count(&self) -> usize {
        self.inner.read().await.purchases.len()
    }
}

#[async_trait]
impl ArticleStore for InMemoryMarketStore {
    async fn get_article(&self, article_id: &ArticleId) -> Result<Option<Article>> {
        let inner = self.inner.read().await;
        Ok(inner.articles.get(article_id).cloned())
    }

    async fn get_price_history(&self, article_id: &ArticleId) -> Result<Vec<PriceHistoryEntry>> {
        let inner = self.inner.read().await;
        Ok(inner.history.get(article_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl PurchaseStore for InMemoryMarketStore {
    async fn create_if_absent(&self, record: PurchaseRecord) -> Result<()> {
        let mut inner = self.inner.write().await;
        let key = (record.article_id.clone(), record.user_id.clone());

        if inner.purchases.contains_key(&key) {
            return Err(StoreError::DuplicatePurchase {
                article_id: key.0,
                user_id: key.1,
            });
        }

        inner.purchases.insert(key, record);
        Ok(())
    }

    async fn set_burn_transfer_id(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
        transfer_id: TransferId,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        let record = inner
            .purchases
            .get_mut(&(article_id.clone(), user_id.clone()))
            .ok_or_else(|| StoreError::RecordNotFound {
                article_id: article_id.clone(),
                user_id: user_id.clone(),
            })?;

        record.burn_transfer_id = Some(transfer_id);
        Ok(())
    }

    async fn set_status(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
        status: SettlementStatus,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        let record = inner
            .purchases
            .get_mut(&(article_id.clone(), user_id.clone()))
            .ok_or_else(|| StoreError::RecordNotFound {
                article_id: article_id.clone(),
                user_id: user_id.clone(),
            })?;

        record.status = Some(status);
        Ok(())
    }

    async fn get_purchase(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
    ) -> Result<Option<PurchaseRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .purchases
            .get(&(article_id.clone(), user_id.clone()))
            .cloned())
    }
}

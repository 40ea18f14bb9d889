use common::{ArticleId, UserId};
use thiserror::Error;

/// Errors that can occur when interacting with the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The conditional create found an existing record for the same
    /// (article, buyer) pair.
    #[error("Purchase record already exists for article {article_id} and user {user_id}")]
    DuplicatePurchase {
        article_id: ArticleId,
        user_id: UserId,
    },

    /// A field update targeted a record that does not exist.
    #[error("Purchase record not found for article {article_id} and user {user_id}")]
    RecordNotFound {
        article_id: ArticleId,
        user_id: UserId,
    },

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

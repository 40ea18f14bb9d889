//! Identity directory trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{EthAddress, UserId};
use tokio::sync::RwLock;

use crate::error::{PurchaseError, Result};

/// Trait for resolving a user's registered ledger address.
#[async_trait]
pub trait AddressDirectory: Send + Sync {
    /// Returns the user's ledger address.
    ///
    /// Fails with [`PurchaseError::AddressNotFound`] unless the user has
    /// exactly one registered address attribute. Zero and multiple are
    /// both invariant violations, not retryable conditions.
    async fn get_address(&self, user_id: &UserId) -> Result<EthAddress>;
}

/// In-memory directory for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    addresses: Arc<RwLock<HashMap<UserId, Vec<EthAddress>>>>,
}

impl InMemoryDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an address attribute for a user. Calling twice for the
    /// same user produces the multiple-attribute invariant violation.
    pub async fn register(&self, user_id: impl Into<UserId>, address: impl Into<EthAddress>) {
        self.addresses
            .write()
            .await
            .entry(user_id.into())
            .or_default()
            .push(address.into());
    }
}

#[async_trait]
impl AddressDirectory for InMemoryDirectory {
    async fn get_address(&self, user_id: &UserId) -> Result<EthAddress> {
        let addresses = self.addresses.read().await;
        match addresses.get(user_id).map(Vec::as_slice) {
            Some([address]) => Ok(address.clone()),
            _ => Err(PurchaseError::AddressNotFound(user_id.clone())),
        }
    }
}

//! Purchase saga orchestrator.

use common::EthAddress;
use domain::{PurchaseRequest, SettlementStatus, latest_history_match};
use record_store::{ArticleStore, PurchaseRecord, PurchaseStore, StoreError};

use crate::error::{PurchaseError, Result};
use crate::poller::{ConfirmationPoller, PollerConfig};
use crate::services::directory::AddressDirectory;
use crate::services::ledger::LedgerClient;

/// Orchestrates the end-to-end purchase saga for one validated request.
///
/// Side effects are strictly ordered and non-transactional: each external
/// call's effect is durable and never undone by a later failure. The
/// transfers themselves are irreversible ledger operations, so the design
/// leaves a diagnosable partial record instead of attempting compensating
/// transactions.
pub struct PurchaseOrchestrator<S, L, D>
where
    S: ArticleStore + PurchaseStore,
    L: LedgerClient,
    D: AddressDirectory,
{
    store: S,
    ledger: L,
    directory: D,
    burn_address: EthAddress,
    poller: ConfirmationPoller,
}

impl<S, L, D> PurchaseOrchestrator<S, L, D>
where
    S: ArticleStore + PurchaseStore,
    L: LedgerClient,
    D: AddressDirectory,
{
    /// Creates a new orchestrator with injected dependencies.
    pub fn new(
        store: S,
        ledger: L,
        directory: D,
        burn_address: EthAddress,
        poller_config: PollerConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            directory,
            burn_address,
            poller: ConfirmationPoller::new(poller_config),
        }
    }

    /// Executes the purchase saga and returns the settlement status.
    ///
    /// The request is assumed to have passed validation (positive
    /// whole-token price matching the article's current price, published
    /// article); this method re-reads the article and enforces the gates
    /// that depend on it: the article must be priced and must not belong
    /// to the buyer.
    #[tracing::instrument(
        skip(self, request, buyer_address),
        fields(article_id = %request.article_id, user_id = %request.user_id)
    )]
    pub async fn purchase(
        &self,
        request: &PurchaseRequest,
        buyer_address: &EthAddress,
    ) -> Result<SettlementStatus> {
        metrics::counter!("purchase_total").increment(1);
        let start = std::time::Instant::now();

        let result = self.run(request, buyer_address).await;

        metrics::histogram!("purchase_duration_seconds").record(start.elapsed().as_secs_f64());
        match &result {
            Ok(status) => {
                metrics::counter!("purchase_completed").increment(1);
                tracing::info!(%status, "purchase settled");
            }
            Err(e) => {
                metrics::counter!("purchase_failed").increment(1);
                tracing::warn!(error = %e, "purchase failed");
            }
        }

        result
    }

    async fn run(
        &self,
        request: &PurchaseRequest,
        buyer_address: &EthAddress,
    ) -> Result<SettlementStatus> {
        // 1. Article gate: must exist, be priced, and not be the buyer's own.
        let article = self
            .store
            .get_article(&request.article_id)
            .await?
            .ok_or_else(|| PurchaseError::ArticleNotFound(request.article_id.clone()))?;

        if article.price.is_none() {
            return Err(PurchaseError::NotPurchasable(request.article_id.clone()));
        }
        if article.is_owned_by(&request.user_id) {
            return Err(PurchaseError::SelfPurchase);
        }

        // Fast-path duplicate rejection so a retried request never
        // resubmits a transfer. The conditional create below remains the
        // authoritative boundary under concurrency.
        if self
            .store
            .get_purchase(&request.article_id, &request.user_id)
            .await?
            .is_some()
        {
            return Err(PurchaseError::DuplicatePurchase {
                article_id: request.article_id.clone(),
                user_id: request.user_id.clone(),
            });
        }

        // 2. Seller address. Fatal if the directory invariant is violated;
        // nothing has been submitted yet.
        let seller_address = self.directory.get_address(&article.user_id).await?;

        // 3. Purchase transfer: 9/10 of the price, buyer to seller. A ledger
        // error here is fatal but leaves no durable trace.
        let purchase_transfer_id = self
            .ledger
            .submit_transfer(
                buyer_address,
                &seller_address,
                &request.price.purchase_portion().to_hex64(),
            )
            .await?;
        tracing::info!(transfer_id = %purchase_transfer_id, "purchase transfer accepted");

        // 4. Audit pointer: newest history entry matching the current price.
        let history = self.store.get_price_history(&request.article_id).await?;
        let history_created_at =
            article.price.and_then(|current| latest_history_match(&history, current));

        // 5. Conditional create: the idempotency boundary. A concurrent or
        // repeated attempt for the same (article, buyer) must not overwrite.
        let record = PurchaseRecord::new(
            &article,
            request.user_id.clone(),
            purchase_transfer_id.clone(),
            request.price,
            history_created_at,
        );
        self.store.create_if_absent(record).await.map_err(|e| match e {
            StoreError::DuplicatePurchase {
                article_id,
                user_id,
            } => PurchaseError::DuplicatePurchase {
                article_id,
                user_id,
            },
            other => PurchaseError::Store(other),
        })?;

        // 6. Burn transfer: 1/10 of the price to the null address. On
        // failure the record created above remains without a burn ID and
        // the error propagates; the purchase transfer already happened, so
        // the record must persist for reconciliation.
        let burn_transfer_id = self
            .ledger
            .submit_transfer(
                buyer_address,
                &self.burn_address,
                &request.price.burn_portion().to_hex64(),
            )
            .await
            .inspect_err(|e| {
                tracing::error!(
                    purchase_transfer_id = %purchase_transfer_id,
                    error = %e,
                    "burn transfer failed; purchase record kept without burn id"
                );
            })?;

        // 7. Attach the burn ID.
        self.store
            .set_burn_transfer_id(&request.article_id, &request.user_id, burn_transfer_id)
            .await?;

        // 8. Poll the purchase transfer for confirmation.
        let status = self.poller.poll(&self.ledger, &purchase_transfer_id).await;

        // 9. Record the settlement status.
        self.store
            .set_status(&request.article_id, &request.user_id, status)
            .await?;

        // 10. Report to the caller.
        Ok(status)
    }
}

//! Purchase endpoint and shared application state.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use common::EthAddress;
use domain::{PurchaseRequest, TokenAmount, validate_request};
use purchase::{AddressDirectory, LedgerClient, PurchaseOrchestrator};
use record_store::{ArticleStore, PurchaseStore};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S, L, D>
where
    S: ArticleStore + PurchaseStore,
    L: LedgerClient,
    D: AddressDirectory,
{
    pub store: S,
    pub orchestrator: PurchaseOrchestrator<S, L, D>,
}

#[derive(Deserialize)]
pub struct PurchaseBody {
    /// Price in wei; must match the article's current price.
    pub price: u128,
}

#[derive(Serialize)]
pub struct PurchaseResponse {
    pub status: String,
}

/// POST /me/articles/{article_id}/purchase — run the purchase saga.
///
/// Buyer identity and ledger address come from the `x-user-id` and
/// `x-eth-address` headers, standing in for the upstream authorizer
/// claims.
#[tracing::instrument(skip(state, headers, body))]
pub async fn create<S, L, D>(
    State(state): State<Arc<AppState<S, L, D>>>,
    Path(article_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<PurchaseBody>,
) -> Result<Json<PurchaseResponse>, ApiError>
where
    S: ArticleStore + PurchaseStore + 'static,
    L: LedgerClient + 'static,
    D: AddressDirectory + 'static,
{
    let user_id = required_header(&headers, "x-user-id")?;
    let buyer_address = EthAddress::new(required_header(&headers, "x-eth-address")?);

    let request = PurchaseRequest::new(user_id, article_id, TokenAmount::from_wei(body.price));

    // Validation gate: rejects fractional or stale prices and unpublished
    // articles before the orchestrator submits anything.
    let article = state
        .store
        .get_article(&request.article_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Article {} not found", request.article_id)))?;
    validate_request(&request, &article)?;

    let status = state.orchestrator.purchase(&request, &buyer_address).await?;

    Ok(Json(PurchaseResponse {
        status: status.as_str().to_string(),
    }))
}

fn required_header(headers: &HeaderMap, name: &str) -> Result<String, ApiError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::BadRequest(format!("{name} header is required")))
}

//! Read-only article price endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::ArticleId;
use purchase::{AddressDirectory, LedgerClient};
use record_store::{ArticleStore, PurchaseStore};
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::purchase::AppState;

#[derive(Serialize)]
pub struct PriceResponse {
    pub article_id: String,
    /// Current price in wei.
    pub price: u128,
}

/// GET /articles/{article_id}/price — current price of a paid article.
#[tracing::instrument(skip(state))]
pub async fn price<S, L, D>(
    State(state): State<Arc<AppState<S, L, D>>>,
    Path(article_id): Path<String>,
) -> Result<Json<PriceResponse>, ApiError>
where
    S: ArticleStore + PurchaseStore + 'static,
    L: LedgerClient + 'static,
    D: AddressDirectory + 'static,
{
    let article_id = ArticleId::new(article_id);
    let article = state
        .store
        .get_article(&article_id)
        .await?
        .filter(|a| a.is_public())
        .ok_or_else(|| ApiError::NotFound(format!("Article {article_id} not found")))?;

    let price = article
        .price
        .ok_or_else(|| ApiError::NotFound("This article is not a paid article".to_string()))?;

    Ok(Json(PriceResponse {
        article_id: article_id.to_string(),
        price: price.wei(),
    }))
}

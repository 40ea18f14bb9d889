//! HTTP API server with observability for the paid-article marketplace.
//!
//! Provides the purchase endpoint and the read-only price lookup, with
//! structured logging (tracing) and Prometheus metrics. The upstream API
//! gateway's wire format and the real identity system are out of scope;
//! buyer identity arrives as headers.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use common::EthAddress;
use metrics_exporter_prometheus::PrometheusHandle;
use purchase::{
    AddressDirectory, InMemoryDirectory, InMemoryLedger, LedgerClient, PollerConfig,
    PurchaseOrchestrator,
};
use record_store::{ArticleStore, PurchaseStore, InMemoryMarketStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::purchase::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, L, D>(
    state: Arc<AppState<S, L, D>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    S: ArticleStore + PurchaseStore + Clone + 'static,
    L: LedgerClient + 'static,
    D: AddressDirectory + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/articles/{article_id}/price",
            get(routes::articles::price::<S, L, D>),
        )
        .route(
            "/me/articles/{article_id}/purchase",
            post(routes::purchase::create::<S, L, D>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state from explicit dependencies.
pub fn create_state<S, L, D>(
    store: S,
    ledger: L,
    directory: D,
    burn_address: EthAddress,
    poller_config: PollerConfig,
) -> Arc<AppState<S, L, D>>
where
    S: ArticleStore + PurchaseStore + Clone + 'static,
    L: LedgerClient + 'static,
    D: AddressDirectory + 'static,
{
    let orchestrator = PurchaseOrchestrator::new(
        store.clone(),
        ledger,
        directory,
        burn_address,
        poller_config,
    );
    Arc::new(AppState {
        store,
        orchestrator,
    })
}

/// Creates default application state backed entirely by in-memory fakes,
/// with a fast polling budget. Used by tests and local development.
pub fn create_default_state() -> (
    Arc<AppState<InMemoryMarketStore, InMemoryLedger, InMemoryDirectory>>,
    InMemoryMarketStore,
    InMemoryLedger,
    InMemoryDirectory,
) {
    let store = InMemoryMarketStore::new();
    let ledger = InMemoryLedger::new();
    let directory = InMemoryDirectory::new();

    let state = create_state(
        store.clone(),
        ledger.clone(),
        directory.clone(),
        EthAddress::zero(),
        PollerConfig {
            interval: Duration::from_millis(10),
            max_attempts: 3,
        },
    );

    (state, store, ledger, directory)
}

//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::ArticleId;
use domain::{Article, ArticleStatus, TokenAmount};
use metrics_exporter_prometheus::PrometheusHandle;
use record_store::InMemoryMarketStore;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn setup() -> (
    axum::Router,
    InMemoryMarketStore,
    purchase::InMemoryLedger,
    purchase::InMemoryDirectory,
) {
    let (state, store, ledger, directory) = api::create_default_state();
    let app = api::create_app(state, get_metrics_handle());
    (app, store, ledger, directory)
}

async fn seed_article(store: &InMemoryMarketStore, price: Option<TokenAmount>) {
    store
        .put_article(Article {
            article_id: ArticleId::new("article-1"),
            user_id: "seller".into(),
            title: "On Pricing".to_string(),
            status: ArticleStatus::Public,
            price,
        })
        .await;
}

fn purchase_request(user: &str, price: u128) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/me/articles/article-1/purchase")
        .header("content-type", "application/json")
        .header("x-user-id", user)
        .header("x-eth-address", "0x00000000000000000000000000000000000000aa")
        .body(Body::from(
            serde_json::json!({ "price": price }).to_string(),
        ))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _, _, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_price_show() {
    let (app, store, _, _) = setup().await;
    seed_article(&store, Some(TokenAmount::from_tokens(5))).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/articles/article-1/price")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["article_id"], "article-1");
    assert_eq!(
        json["price"],
        serde_json::json!(TokenAmount::from_tokens(5).wei())
    );
}

#[tokio::test]
async fn test_price_show_unpaid_article_is_404() {
    let (app, store, _, _) = setup().await;
    seed_article(&store, None).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/articles/article-1/price")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "This article is not a paid article");
}

#[tokio::test]
async fn test_price_show_missing_article_is_404() {
    let (app, _, _, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/articles/ghost/price")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_purchase_happy_path() {
    let (app, store, ledger, directory) = setup().await;
    let price = TokenAmount::from_tokens(10);
    seed_article(&store, Some(price)).await;
    directory
        .register("seller", "0x00000000000000000000000000000000000000bb")
        .await;

    let response = app
        .oneshot(purchase_request("buyer", price.wei()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "done");
    assert_eq!(ledger.submitted_count().await, 2);
}

#[tokio::test]
async fn test_purchase_fractional_price_is_400() {
    let (app, store, ledger, directory) = setup().await;
    seed_article(&store, Some(TokenAmount::from_tokens(10))).await;
    directory
        .register("seller", "0x00000000000000000000000000000000000000bb")
        .await;

    let response = app
        .oneshot(purchase_request("buyer", 10_500_000_000_000_000_000))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Decimal value is not allowed");
    assert_eq!(ledger.submitted_count().await, 0);
}

#[tokio::test]
async fn test_purchase_stale_price_is_400() {
    let (app, store, _, directory) = setup().await;
    seed_article(&store, Some(TokenAmount::from_tokens(10))).await;
    directory
        .register("seller", "0x00000000000000000000000000000000000000bb")
        .await;

    let response = app
        .oneshot(purchase_request(
            "buyer",
            TokenAmount::from_tokens(9).wei(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_self_purchase_is_400() {
    let (app, store, ledger, directory) = setup().await;
    let price = TokenAmount::from_tokens(10);
    seed_article(&store, Some(price)).await;
    directory
        .register("seller", "0x00000000000000000000000000000000000000bb")
        .await;

    let response = app
        .oneshot(purchase_request("seller", price.wei()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ledger.submitted_count().await, 0);
}

#[tokio::test]
async fn test_repeat_purchase_is_409() {
    let (app, store, _, directory) = setup().await;
    let price = TokenAmount::from_tokens(10);
    seed_article(&store, Some(price)).await;
    directory
        .register("seller", "0x00000000000000000000000000000000000000bb")
        .await;

    let first = app
        .clone()
        .oneshot(purchase_request("buyer", price.wei()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(purchase_request("buyer", price.wei()))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_missing_identity_header_is_400() {
    let (app, store, _, _) = setup().await;
    let price = TokenAmount::from_tokens(10);
    seed_article(&store, Some(price)).await;

    let request = Request::builder()
        .method("POST")
        .uri("/me/articles/article-1/purchase")
        .header("content-type", "application/json")
        .header("x-eth-address", "0x00000000000000000000000000000000000000aa")
        .body(Body::from(
            serde_json::json!({ "price": price.wei() }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_purchase_unknown_article_is_404() {
    let (app, _, _, _) = setup().await;

    let request = Request::builder()
        .method("POST")
        .uri("/me/articles/ghost/purchase")
        .header("content-type", "application/json")
        .header("x-user-id", "buyer")
        .header("x-eth-address", "0x00000000000000000000000000000000000000aa")
        .body(Body::from(
            serde_json::json!({ "price": TokenAmount::from_tokens(1).wei() }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _, _, _) = setup().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

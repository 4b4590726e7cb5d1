//! Tests de integración de la superficie HTTP de pedidos.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use order_domain::{DomainError, InMemoryOrderRepository, OrderCache, OrderRepository, OrderStubs};
use order_flow::{IngestPipeline, OrderReader};
use order_service::http::{router, AppState};
use tower::ServiceExt;

const A1: &str = r#"{"order_uid":"A1","delivery":{},"payment":{},"items":[{"x":1}]}"#;

struct Setup {
    app: Router,
    repo: Arc<InMemoryOrderRepository>,
    cache: Arc<OrderCache>,
    pipeline: IngestPipeline<InMemoryOrderRepository>,
}

fn setup() -> Setup {
    let repo = Arc::new(InMemoryOrderRepository::new());
    let cache = Arc::new(OrderCache::new());
    let pipeline = IngestPipeline::new(repo.clone(), cache.clone());
    let dyn_repo: Arc<dyn OrderRepository> = repo.clone();
    let state = AppState {
        reader: Arc::new(OrderReader::new(dyn_repo, cache.clone())),
    };
    Setup {
        app: router(state, None),
        repo,
        cache,
        pipeline,
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, Bytes) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body)
}

#[tokio::test]
async fn test_ingested_order_is_served_byte_for_byte() {
    let s = setup();
    s.pipeline.handle(1, Bytes::from_static(A1.as_bytes()));

    let (status, content_type, body) = get(&s.app, "/order/A1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body.as_ref(), A1.as_bytes());
}

#[tokio::test]
async fn test_unknown_order_is_404() {
    let s = setup();
    let (status, _, body) = get(&s.app, "/order/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "not found");
}

#[tokio::test]
async fn test_empty_id_is_400() {
    let s = setup();
    let (status, _, body) = get(&s.app, "/order/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "missing id");
}

#[tokio::test]
async fn test_store_only_order_is_served_and_backfilled() {
    let s = setup();
    let payload = OrderStubs::sample_order("cold");
    s.repo.save_order("cold", &payload).unwrap();
    assert!(s.cache.get("cold").is_none());

    let (status, _, body) = get(&s.app, "/order/cold").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, payload);
    assert_eq!(s.cache.get("cold"), Some(payload));
}

#[tokio::test]
async fn test_list_all_returns_cached_orders() {
    let s = setup();
    let (status, _, body) = get(&s.app, "/order/all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_ref(), b"[]");

    s.pipeline.handle(1, Bytes::from_static(A1.as_bytes()));
    s.pipeline.handle(2, OrderStubs::sample_order("B2"));
    // Stored but never cached: not part of the listing
    s.repo
        .save_order("store-only", &OrderStubs::sample_order("store-only"))
        .unwrap();

    let (status, content_type, body) = get(&s.app, "/order/all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let listed: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed.len(), 2);
    let a1 = listed
        .iter()
        .find(|e| e["order_uid"] == "A1")
        .expect("A1 listed");
    let expected: serde_json::Value = serde_json::from_str(A1).unwrap();
    assert_eq!(a1["data"], expected);
    assert!(listed.iter().any(|e| e["order_uid"] == "B2"));
}

struct BrokenRepository;

impl OrderRepository for BrokenRepository {
    fn get_order(&self, _order_uid: &str) -> Result<Option<Bytes>, DomainError> {
        Err(DomainError::Persistence("db: connection refused".into()))
    }

    fn save_order(&self, _order_uid: &str, _payload: &Bytes) -> Result<(), DomainError> {
        Err(DomainError::Persistence("db: connection refused".into()))
    }

    fn count_orders(&self) -> Result<i64, DomainError> {
        Err(DomainError::Persistence("db: connection refused".into()))
    }

    fn list_orders(&self) -> Result<Vec<(String, Bytes)>, DomainError> {
        Err(DomainError::Persistence("db: connection refused".into()))
    }
}

#[tokio::test]
async fn test_store_error_is_500_but_cache_still_serves() {
    let repo: Arc<dyn OrderRepository> = Arc::new(BrokenRepository);
    let cache = Arc::new(OrderCache::new());
    let pipeline = IngestPipeline::new(repo.clone(), cache.clone());
    let app = router(
        AppState {
            reader: Arc::new(OrderReader::new(repo, cache)),
        },
        None,
    );

    let (status, _, body) = get(&app, "/order/anything").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "internal error");

    // Persistence fails, but the ingested order is readable from the cache
    pipeline.handle(1, Bytes::from_static(A1.as_bytes()));
    let (status, _, body) = get(&app, "/order/A1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_ref(), A1.as_bytes());
}

#[tokio::test]
async fn test_static_files_are_served_from_web_dir() {
    let dir = std::env::temp_dir().join(format!("orders_web_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<html>orders</html>").unwrap();

    let repo: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());
    let app = router(
        AppState {
            reader: Arc::new(OrderReader::new(repo, Arc::new(OrderCache::new()))),
        },
        Some(dir.as_path()),
    );

    let (status, _, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_ref(), b"<html>orders</html>");

    // API routes still win over the static fallback
    let (status, _, _) = get(&app, "/order/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = std::fs::remove_dir_all(dir);
}

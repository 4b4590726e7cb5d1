//! Superficie HTTP: consulta por `order_uid`, listado de los pedidos
//! cacheados y la interfaz web estática.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use order_domain::{DomainError, OrderRepository};
use order_flow::OrderReader;
use serde::Serialize;
use serde_json::value::RawValue;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Estado compartido por los handlers.
#[derive(Clone)]
pub struct AppState {
    pub reader: Arc<OrderReader<dyn OrderRepository>>,
}

/// Las respuestas de error tienen el formato:
/// ```json
/// { "status": "error", "message": "..." }
/// ```
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    NotFound,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        };

        let body = serde_json::json!({
            "status": "error",
            "message": message
        });

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        tracing::error!("order lookup failed: {}", err);
        ApiError::Internal
    }
}

/// Elemento del listado `/order/all`; `data` se incrusta tal cual.
#[derive(Serialize)]
struct OrderEntry {
    order_uid: String,
    data: Box<RawValue>,
}

/// Construye el router. Con `web_dir`, las rutas que no coinciden se sirven
/// desde ese directorio.
pub fn router(state: AppState, web_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/order/", get(handle_missing_id))
        .route("/order/all", get(handle_list_orders))
        .route("/order/:id", get(handle_get_order))
        .with_state(state);

    let app = match web_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };
    app.layer(TraceLayer::new_for_http())
}

/// GET /order/
async fn handle_missing_id() -> ApiError {
    ApiError::BadRequest("missing id")
}

/// GET /order/{id}
///
/// Caché primero; si falla, el almacenamiento se consulta en el pool
/// bloqueante y se rellena la caché.
async fn handle_get_order(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Response, ApiError> {
    if id.is_empty() {
        return Err(ApiError::BadRequest("missing id"));
    }

    let reader = state.reader.clone();
    let found = tokio::task::spawn_blocking(move || reader.get_by_key(&id))
        .await
        .map_err(|e| {
            tracing::error!("order lookup task failed: {}", e);
            ApiError::Internal
        })??;

    match found {
        Some(payload) => Ok(([(header::CONTENT_TYPE, "application/json")], payload).into_response()),
        None => Err(ApiError::NotFound),
    }
}

/// GET /order/all
///
/// Lista lo que hay en caché; no consulta el almacenamiento.
async fn handle_list_orders(State(state): State<AppState>) -> Json<Vec<OrderEntry>> {
    let entries = state
        .reader
        .list_all()
        .into_iter()
        .filter_map(|(order_uid, payload)| {
            let parsed = std::str::from_utf8(&payload)
                .map_err(|e| e.to_string())
                .and_then(|s| RawValue::from_string(s.to_string()).map_err(|e| e.to_string()));
            match parsed {
                Ok(data) => Some(OrderEntry { order_uid, data }),
                Err(e) => {
                    tracing::warn!("skipping cached order {} with non-JSON payload: {}", order_uid, e);
                    None
                }
            }
        })
        .collect();
    Json(entries)
}

//! Application router configuration.

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{
    AppState, Error, endpoints,
    summary::{get_category_summary_endpoint, get_summary_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        list_transactions_endpoint,
    },
};

/// The largest request body, in bytes, the API accepts.
pub const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::SUMMARY_CATEGORIES,
            get(get_category_summary_endpoint),
        )
        .route(endpoints::HEALTH, get(get_health))
        .fallback(get_404_not_found)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}

/// Build the CORS layer for browser clients.
///
/// An empty `allowed_origins` allows any origin. Origins that are not valid
/// header values are skipped with a warning.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    layer.allow_origin(AllowOrigin::list(parse_origins(allowed_origins)))
}

fn parse_origins(allowed_origins: &[String]) -> Vec<HeaderValue> {
    allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(origin) => Some(origin),
            Err(error) => {
                tracing::warn!("Ignoring invalid CORS origin {origin:?}: {error}");
                None
            }
        })
        .collect()
}

async fn get_health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}

//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;

use crate::{Error, MAX_REQUEST_BODY_BYTES, ValidationError};

/// Bodies longer than this many characters are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Request bodies are read up to [MAX_REQUEST_BODY_BYTES], the same limit the
/// router enforces, and larger bodies are answered with `413 Payload Too Large`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(
                "Could not read request body for {} {}: {error}",
                parts.method,
                parts.uri
            );
            return request_body_error(error).into_response();
        }
    };

    log_request(&parts, &String::from_utf8_lossy(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            Bytes::new()
        }
    };

    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn request_body_error(error: axum::Error) -> Error {
    let message = error.to_string();

    if error.into_inner().is::<LengthLimitError>() {
        Error::PayloadTooLarge
    } else {
        Error::Validation(ValidationError::MalformedBody(message))
    }
}

/// Cut `body` down to [LOG_BODY_LENGTH_LIMIT] characters, or `None` if it
/// already fits.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(index, _)| &body[..index])
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    let (method, uri) = (&parts.method, &parts.uri);

    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Received request: {method} {uri}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {method} {uri}\nbody: {body:?}"),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    let status = parts.status;

    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {status}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {status}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, middleware, routing::post};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        LOG_BODY_LENGTH_LIMIT, MAX_REQUEST_BODY_BYTES, build_router, endpoints, logging::truncate,
        logging_middleware, test_utils::must_create_test_state,
    };

    fn must_create_logged_api_server() -> TestServer {
        let app =
            build_router(must_create_test_state()).layer(middleware::from_fn(logging_middleware));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[test]
    fn short_body_is_not_truncated() {
        assert_eq!(truncate("{\"title\":\"Coffee\"}"), None);
    }

    #[test]
    fn long_body_is_truncated_to_limit() {
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT + 10);

        assert_eq!(truncate(&body).map(str::len), Some(LOG_BODY_LENGTH_LIMIT));
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        let body = "฿".repeat(LOG_BODY_LENGTH_LIMIT + 1);

        let truncated = truncate(&body).unwrap();

        assert_eq!(truncated.chars().count(), LOG_BODY_LENGTH_LIMIT);
    }

    #[tokio::test]
    async fn middleware_passes_request_body_through() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.post("/echo").text("hello ledger").await;

        response.assert_status_ok();
        response.assert_text("hello ledger");
    }

    #[tokio::test]
    async fn middleware_preserves_api_responses() {
        let server = must_create_logged_api_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({"title": "Coffee", "amount": 3.5, "type": "expense"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["title"], "Coffee");
    }

    #[tokio::test]
    async fn middleware_accepts_large_bodies_within_router_limit() {
        let server = must_create_logged_api_server();
        let title = "a".repeat(1_500_000);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({"title": title, "amount": 3.5, "type": "expense"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["title"].as_str().map(str::len), Some(1_500_000));
    }

    #[tokio::test]
    async fn middleware_rejects_oversized_body_as_payload_too_large() {
        let server = must_create_logged_api_server();
        let title = "a".repeat(MAX_REQUEST_BODY_BYTES + 1);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({"title": title, "amount": 3.5, "type": "expense"}))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let body: serde_json::Value = response.json();
        assert!(body["error"].is_string());
    }
}

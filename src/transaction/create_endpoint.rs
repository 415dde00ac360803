//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    transaction::CreateTransactionRequest,
};

/// A route handler for creating a new transaction.
///
/// Responds with `201 Created`, the stored transaction (including the ID and
/// date assigned by the store) and a `Location` header pointing at it.
///
/// # Errors
/// Returns a validation error for missing fields, an unknown type or an
/// amount that is not a number, and a storage error if the write fails.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(request) = payload?;

    let new_transaction = request.validate()?;

    let transaction = state.store.create(new_transaction).inspect_err(|error| {
        tracing::error!("could not create transaction: {error}");
    })?;

    tracing::info!(
        "Created {} transaction {} for {}",
        transaction.kind,
        transaction.id,
        transaction.amount
    );

    let location = format_endpoint(endpoints::TRANSACTION, &transaction.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(transaction)).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State, http::StatusCode};
    use serde_json::json;

    use crate::{
        AppState, Error, MAX_REQUEST_BODY_BYTES, UnavailableStore, ValidationError, endpoints,
        test_utils::{must_create_test_server, must_create_test_state, parse_json},
        transaction::{CreateTransactionRequest, Transaction, create_transaction_endpoint},
    };

    fn request(value: serde_json::Value) -> CreateTransactionRequest {
        serde_json::from_value(value).expect("could not parse test request")
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = must_create_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Ok(Json(request(
                json!({"title": "Salary", "amount": 2500, "type": "income", "category": "work"}),
            ))),
        )
        .await
        .expect("create failed");

        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()["location"].to_str().unwrap().to_owned();
        let body = parse_json(response).await;
        let id = body["id"].as_str().expect("id missing");
        assert_eq!(location, format!("/transactions/{id}"));

        let stored = state.store.get(id).expect("transaction was not stored");
        assert_eq!(stored.title, "Salary");
        assert_eq!(stored.amount, 2500.0);
        assert_eq!(stored.category, "work");
    }

    #[tokio::test]
    async fn rejects_unknown_type() {
        let state = must_create_test_state();

        let result = create_transaction_endpoint(
            State(state.clone()),
            Ok(Json(request(
                json!({"title": "Piggy bank", "amount": 10, "type": "savings"}),
            ))),
        )
        .await;

        assert_eq!(
            result.map(|response| response.status()),
            Err(Error::Validation(ValidationError::InvalidType(
                "savings".to_owned()
            )))
        );
        assert_eq!(state.store.query(Default::default()), Ok(vec![]));
    }

    #[tokio::test]
    async fn storage_failure_is_propagated() {
        let state = AppState::new(UnavailableStore::new("offline"));

        let result = create_transaction_endpoint(
            State(state),
            Ok(Json(request(json!({"title": "x", "amount": 1, "type": "income"})))),
        )
        .await;

        assert!(matches!(result, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn coffee_scenario_over_http() {
        let server = must_create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({"title": "Coffee", "amount": "3.5", "type": "expense"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction: Transaction = response.json();
        assert!(!transaction.id.is_empty());
        assert_eq!(transaction.amount, 3.5);
        assert_eq!(transaction.category, "other");
        let body: serde_json::Value = response.json();
        assert_eq!(body["type"], "expense");
        assert!(body["date"].is_string());
    }

    #[tokio::test]
    async fn savings_type_over_http_is_bad_request() {
        let server = must_create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({"title": "Piggy bank", "amount": 10, "type": "savings"}))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let server = must_create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .text("{\"title\": ")
            .content_type("application/json")
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
    }

    #[tokio::test]
    async fn missing_fields_over_http_is_bad_request() {
        let server = must_create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({"title": "No amount"}))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "missing required field(s): amount, type");
    }

    #[tokio::test]
    async fn missing_fields_are_reported_before_wrongly_typed_ones() {
        let server = must_create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({"type": 5}))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "missing required field(s): title, amount");
    }

    #[tokio::test]
    async fn wrongly_typed_type_is_invalid_type() {
        let server = must_create_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({"title": "Coffee", "amount": 3.5, "type": 5}))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(
            body["error"],
            "invalid type \"5\", expected \"income\" or \"expense\""
        );
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let server = must_create_test_server();
        let title = "a".repeat(MAX_REQUEST_BODY_BYTES + 1);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({"title": title, "amount": 3.5, "type": "expense"}))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }
}

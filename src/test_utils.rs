#![allow(missing_docs)]

use axum::{body::Body, http::Response};
use axum_test::TestServer;

use crate::{
    AppState, SQLiteTransactionStore, build_router,
    transaction::{NewTransaction, TransactionType},
};

/// Create an [AppState] backed by a fresh in-memory database.
pub(crate) fn must_create_test_state() -> AppState {
    AppState::new(
        SQLiteTransactionStore::open_in_memory().expect("could not create in-memory store"),
    )
}

/// Create a test server for the full router with an empty store.
pub(crate) fn must_create_test_server() -> TestServer {
    TestServer::try_new(build_router(must_create_test_state())).expect("Could not create test server.")
}

/// Create a test server whose store already holds `transactions`, each
/// stamped with its paired RFC 3339 date instead of the current time.
pub(crate) fn must_create_dated_test_server(
    transactions: Vec<(NewTransaction, &str)>,
) -> TestServer {
    let store = SQLiteTransactionStore::open_in_memory().expect("could not create in-memory store");
    for (transaction, date) in transactions {
        store.insert_with_date(transaction, date);
    }

    TestServer::try_new(build_router(AppState::new(store))).expect("Could not create test server.")
}

pub(crate) fn new_transaction(
    title: &str,
    amount: f64,
    kind: TransactionType,
    category: &str,
) -> NewTransaction {
    NewTransaction {
        title: title.to_owned(),
        amount,
        kind,
        category: category.to_owned(),
    }
}

/// Read a response body as JSON.
pub(crate) async fn parse_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("could not read response body");

    serde_json::from_slice(&body).expect("response body is not valid JSON")
}

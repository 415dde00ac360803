//! Defines the endpoint for updating an existing transaction.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    AppState, Error,
    transaction::{Transaction, UpdateTransactionRequest},
};

/// A route handler for applying a partial update to a transaction.
///
/// The transaction is looked up before the body is validated, so an unknown
/// ID is reported as not found even when the body is also invalid. The ID and
/// creation date cannot be changed.
///
/// # Errors
/// Returns a not found error if no transaction has `transaction_id`, a
/// validation error if the body is malformed, contains no recognised fields or
/// has an invalid field, and a storage error if the store fails.
pub async fn edit_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    payload: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    state.store.get(&transaction_id)?;

    let Json(request) = payload?;
    let patch = request.into_patch()?;

    // The transaction may have been deleted since the lookup above, in which
    // case the store reports it as not found.
    let transaction = state
        .store
        .update(&transaction_id, &patch)
        .inspect_err(|error| {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
        })?;

    tracing::info!("Updated transaction {transaction_id}");

    Ok(Json(transaction))
}

//! Defines the endpoint for deleting a transaction.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// The confirmation sent after a transaction is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    /// A human readable confirmation.
    pub message: String,
    /// The ID of the deleted transaction.
    pub id: String,
}

/// A route handler for permanently deleting a transaction.
///
/// # Errors
/// Returns a not found error if no transaction has `transaction_id`, or a
/// storage error if the store fails.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<DeleteConfirmation>, Error> {
    state.store.get(&transaction_id)?;

    state.store.delete(&transaction_id).inspect_err(|error| {
        tracing::error!("Could not delete transaction {transaction_id}: {error}");
    })?;

    tracing::info!("Deleted transaction {transaction_id}");

    Ok(Json(DeleteConfirmation {
        message: "Transaction deleted".to_owned(),
        id: transaction_id,
    }))
}

//! Defines the endpoint for listing transactions.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error, MonthRange,
    store::{SortOrder, TransactionQuery},
    transaction::Transaction,
};

/// The query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only include transactions created in this month, formatted `YYYY-MM`.
    pub month: Option<String>,
}

/// A route handler that returns transactions, most recent first.
///
/// # Errors
/// Returns a validation error if `month` is not a valid `YYYY-MM` string.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let date_range = query
        .month
        .as_deref()
        .map(str::parse::<MonthRange>)
        .transpose()?
        .map(|month| month.as_timestamps());

    let transactions = state.store.query(TransactionQuery {
        date_range,
        sort_date: Some(SortOrder::Descending),
    })?;

    tracing::debug!("Listing {} transactions", transactions.len());

    Ok(Json(transactions))
}

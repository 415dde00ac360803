//! Route handlers for the monthly summaries.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error, MonthRange,
    store::TransactionQuery,
    summary::{CategoryTotal, MonthlySummary, expenses_by_category},
    transaction::Transaction,
};

/// The query parameters for the summary endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// The month to summarise, formatted `YYYY-MM`. Required.
    pub month: Option<String>,
}

/// Fetch the transactions created in the requested month.
fn get_month_transactions(
    state: &AppState,
    query: &SummaryQuery,
) -> Result<Vec<Transaction>, Error> {
    let month = MonthRange::parse_required(query.month.as_deref())?;

    let transactions = state.store.query(TransactionQuery {
        date_range: Some(month.as_timestamps()),
        sort_date: None,
    })?;

    tracing::debug!("Summarising {} transactions for {month}", transactions.len());

    Ok(transactions)
}

/// A route handler that returns the income, expense and balance for a month.
///
/// # Errors
/// Returns a validation error if `month` is missing or malformed, and a
/// storage error if the transactions cannot be fetched.
pub async fn get_summary_endpoint(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<MonthlySummary>, Error> {
    let transactions = get_month_transactions(&state, &query)?;

    Ok(Json(MonthlySummary::from_transactions(&transactions)))
}

/// A route handler that returns the month's expenses grouped by category.
///
/// # Errors
/// Returns a validation error if `month` is missing or malformed, and a
/// storage error if the transactions cannot be fetched.
pub async fn get_category_summary_endpoint(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Vec<CategoryTotal>>, Error> {
    let transactions = get_month_transactions(&state, &query)?;

    Ok(Json(expenses_by_category(&transactions)))
}

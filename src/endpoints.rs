//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].

/// The route for listing and creating transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for updating or deleting a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route for the monthly income, expense and balance summary.
pub const SUMMARY: &str = "/summary";
/// The route for the monthly expense totals grouped by category.
pub const SUMMARY_CATEGORIES: &str = "/summary/categories";
/// The route for checking that the server is up.
pub const HEALTH: &str = "/health";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Assumes `endpoint_path` contains exactly one parameter wrapped in braces,
/// e.g. '{transaction_id}'. Paths without a parameter are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => {
            format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end + 1..])
        }
        _ => endpoint_path.to_owned(),
    }
}

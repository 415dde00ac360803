//! Monthly totals of income and expenses.

mod aggregation;
mod endpoint;

pub use aggregation::{CategoryTotal, MonthlySummary, expenses_by_category};
pub use endpoint::{get_category_summary_endpoint, get_summary_endpoint};

//! Transaction aggregation for the monthly summary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionType};

/// The income, expenses and their difference for a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Sum of the amounts of income transactions.
    pub income: f64,
    /// Sum of the amounts of expense transactions.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

impl MonthlySummary {
    /// Sum `transactions` by type.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let (income, expense) =
            transactions
                .into_iter()
                .fold((0.0, 0.0), |(income, expense), transaction| {
                    match transaction.kind {
                        TransactionType::Income => (income + transaction.amount, expense),
                        TransactionType::Expense => (income, expense + transaction.amount),
                    }
                });

        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// Sum of the expense amounts in the category.
    pub total: f64,
}

/// Groups expenses by category.
///
/// Income is ignored. Returns totals sorted by largest total first, with ties
/// broken by category name.
pub fn expenses_by_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions {
        if transaction.kind == TransactionType::Expense {
            *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount;
        }
    }

    let mut totals: Vec<_> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_owned(),
            total,
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    totals
}

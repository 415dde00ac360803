//! Contains the trait and implementations for objects that store
//! [transactions](crate::Transaction).

mod sqlite;
mod unavailable;

use std::{fmt::Debug, ops::Range};

use time::OffsetDateTime;

use crate::{
    Error,
    transaction::{NewTransaction, Transaction, TransactionPatch},
};

pub use sqlite::SQLiteTransactionStore;
pub use unavailable::UnavailableStore;

/// Handles the persistence of transactions.
///
/// Implementers own the record identity and the creation time: IDs and dates
/// are assigned by the store, never by callers.
pub trait TransactionStore: Debug + Send + Sync {
    /// Persist a new transaction, stamping it with the store's current time.
    ///
    /// # Errors
    /// Returns [Error::Storage] if the write fails.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no transaction has that ID, or
    /// [Error::Storage] if the read fails.
    fn get(&self, id: &str) -> Result<Transaction, Error>;

    /// Apply the fields set in `patch` and return the updated transaction.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no transaction has that ID, or
    /// [Error::Storage] if the write fails.
    fn update(&self, id: &str, patch: &TransactionPatch) -> Result<Transaction, Error>;

    /// Permanently remove a transaction.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no transaction has that ID, or
    /// [Error::Storage] if the write fails.
    fn delete(&self, id: &str) -> Result<(), Error>;

    /// Retrieve transactions in the way defined by `query`.
    ///
    /// # Errors
    /// Returns [Error::Storage] if the read fails.
    fn query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error>;
}

/// Defines how transactions should be fetched from [TransactionStore::query].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Include transactions whose date lies in the half-open `date_range`.
    pub date_range: Option<Range<OffsetDateTime>>,
    /// Orders transactions by date in the order `sort_date`. None returns transactions in the
    /// order they are stored.
    pub sort_date: Option<SortOrder>,
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

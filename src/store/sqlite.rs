//! Implements a SQLite backed transaction store.
use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, Row, params, params_from_iter, types::Type};
use time::{
    OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{
    Error,
    store::{SortOrder, TransactionQuery, TransactionStore},
    transaction::{NewTransaction, Transaction, TransactionPatch},
};

const COLUMNS: &str = "id, title, amount, type, category, date";

/// Stores transactions in a SQLite database.
///
/// The database plays the part of a document store: it generates the opaque
/// string IDs and stamps creation times with its own clock, formatted as
/// fixed-width RFC 3339 UTC strings so that text comparison orders them
/// chronologically.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`, adding the
    /// transaction table if it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::Storage] if the table cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        create_transaction_table(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an [Error::Storage] if the file cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::new(Connection::open(path)?)
    }

    /// Create a store backed by a private in-memory database.
    ///
    /// # Errors
    /// Returns an [Error::Storage] if the database cannot be initialized.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::new(Connection::open_in_memory()?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::Storage("could not acquire the database lock".to_owned())
        })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(&format!(
                "INSERT INTO \"transaction\" (title, amount, type, category)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING {COLUMNS}"
            ))?
            .query_row(
                params![
                    transaction.title,
                    transaction.amount,
                    transaction.kind,
                    transaction.category,
                ],
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    fn get(&self, id: &str) -> Result<Transaction, Error> {
        let transaction = self
            .lock()?
            .prepare(&format!(
                "SELECT {COLUMNS} FROM \"transaction\" WHERE id = ?1"
            ))?
            .query_row(params![id], map_transaction_row)?;

        Ok(transaction)
    }

    /// Apply a sparse update in a single statement.
    ///
    /// Fields that are `None` in `patch` keep their stored value. The `id`
    /// and `date` columns are never written.
    fn update(&self, id: &str, patch: &TransactionPatch) -> Result<Transaction, Error> {
        let transaction = self
            .lock()?
            .prepare(&format!(
                "UPDATE \"transaction\"
                SET \
                    title = COALESCE(?1, title), \
                    amount = COALESCE(?2, amount), \
                    type = COALESCE(?3, type), \
                    category = COALESCE(?4, category) \
                WHERE id = ?5
                RETURNING {COLUMNS}"
            ))?
            .query_row(
                params![patch.title, patch.amount, patch.kind, patch.category, id],
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    fn delete(&self, id: &str) -> Result<(), Error> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", params![id])?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }

    fn query(&self, filter: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts = vec![format!("SELECT {COLUMNS} FROM \"transaction\"")];
        let mut query_parameters = vec![];

        if let Some(date_range) = filter.date_range {
            query_string_parts.push("WHERE date >= ?1 AND date < ?2".to_owned());
            query_parameters.push(format_timestamp(date_range.start)?);
            query_parameters.push(format_timestamp(date_range.end)?);
        }

        // Rows stamped within the same millisecond fall back to insertion order.
        match filter.sort_date {
            Some(SortOrder::Ascending) => {
                query_string_parts.push("ORDER BY date ASC, rowid ASC".to_owned())
            }
            Some(SortOrder::Descending) => {
                query_string_parts.push("ORDER BY date DESC, rowid DESC".to_owned())
            }
            None => {}
        }

        let query_string = query_string_parts.join(" ");

        self.lock()?
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }
}

#[cfg(test)]
impl SQLiteTransactionStore {
    /// Insert `transaction` with a fixed creation `date`, bypassing the
    /// database clock.
    pub(crate) fn insert_with_date(&self, transaction: NewTransaction, date: &str) -> Transaction {
        self.lock()
            .expect("could not acquire the database lock")
            .prepare(&format!(
                "INSERT INTO \"transaction\" (title, amount, type, category, date)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {COLUMNS}"
            ))
            .and_then(|mut statement| {
                statement.query_row(
                    params![
                        transaction.title,
                        transaction.amount,
                        transaction.kind,
                        transaction.category,
                        date,
                    ],
                    map_transaction_row,
                )
            })
            .expect("could not insert test transaction")
    }
}

/// Format `timestamp` the same way the database stamps creation times.
fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, Error> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
        .map_err(|error| Error::Storage(format!("could not format timestamp: {error}")))
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY NOT NULL DEFAULT (lower(hex(randomblob(16)))),
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL,
                date TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let date: String = row.get(5)?;
    let date = OffsetDateTime::parse(&date, &Rfc3339).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(error))
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        category: row.get(4)?,
        date,
    })
}

//! A store that fails every operation, used when the database cannot be opened.

use crate::{
    Error,
    store::{TransactionQuery, TransactionStore},
    transaction::{NewTransaction, Transaction, TransactionPatch},
};

/// Stands in for a store that could not be opened at startup so that the
/// server keeps running and answers every request with a server error.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    /// Create a store that reports `reason` on every call.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> Error {
        Error::Storage(format!("store unavailable: {}", self.reason))
    }
}

impl TransactionStore for UnavailableStore {
    fn create(&self, _transaction: NewTransaction) -> Result<Transaction, Error> {
        Err(self.error())
    }

    fn get(&self, _id: &str) -> Result<Transaction, Error> {
        Err(self.error())
    }

    fn update(&self, _id: &str, _patch: &TransactionPatch) -> Result<Transaction, Error> {
        Err(self.error())
    }

    fn delete(&self, _id: &str) -> Result<(), Error> {
        Err(self.error())
    }

    fn query(&self, _query: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, TransactionQuery, TransactionStore, UnavailableStore};

    #[test]
    fn every_operation_fails_with_storage_error() {
        let store = UnavailableStore::new("unable to open database file");
        let want = Error::Storage("store unavailable: unable to open database file".to_owned());

        assert_eq!(store.get("abc"), Err(want.clone()));
        assert_eq!(store.delete("abc"), Err(want.clone()));
        assert_eq!(store.query(TransactionQuery::default()), Err(want));
    }
}

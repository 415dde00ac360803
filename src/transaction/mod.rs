//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validation of client payloads
//! - Route handlers for listing, creating, updating and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use self::core::{
    AmountInput, CreateTransactionRequest, DEFAULT_CATEGORY, NewTransaction, Transaction,
    TransactionPatch, TransactionType, UpdateTransactionRequest,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;

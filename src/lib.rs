//! Ledger is a small JSON API for recording income and expenses.
//!
//! This library provides the REST API: handlers for listing, creating,
//! updating and deleting transactions, a monthly summary, and the store
//! abstraction the handlers persist through.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod endpoints;
mod logging;
mod month;
mod routing;
mod store;
mod summary;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::MonthRange;
pub use routing::{MAX_REQUEST_BODY_BYTES, build_router, cors_layer};
pub use store::{
    SQLiteTransactionStore, SortOrder, TransactionQuery, TransactionStore, UnavailableStore,
};
pub use summary::{CategoryTotal, MonthlySummary, expenses_by_category};
pub use transaction::{
    AmountInput, CreateTransactionRequest, DEFAULT_CATEGORY, NewTransaction, Transaction,
    TransactionPatch, TransactionType, UpdateTransactionRequest,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent input that is missing, malformed or out of range.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the transaction has not already been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The transaction store could not be reached or failed to complete an
    /// operation.
    ///
    /// The error string should only be logged for debugging on the server.
    /// Clients receive a general message instead.
    #[error("the transaction store failed: {0}")]
    Storage(String),

    /// The request body was larger than [MAX_REQUEST_BODY_BYTES].
    #[error("the request body is larger than the limit of {} bytes", MAX_REQUEST_BODY_BYTES)]
    PayloadTooLarge,
}

/// The ways client input can fail validation.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// One or more required fields were absent or empty.
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The title was present but blank.
    #[error("title cannot be empty")]
    EmptyTitle,

    /// The transaction type was not one of the accepted values.
    #[error("invalid type \"{0}\", expected \"income\" or \"expense\"")]
    InvalidType(String),

    /// The amount could not be read as a non-negative, finite number.
    #[error("invalid amount \"{0}\", expected a number greater than or equal to zero")]
    InvalidAmount(String),

    /// The `month` query parameter was required but not given.
    #[error("the month query parameter is required, expected YYYY-MM")]
    MissingMonth,

    /// The month was not formatted as `YYYY-MM` or does not exist.
    #[error("invalid month \"{0}\", expected YYYY-MM")]
    InvalidMonth(String),

    /// An update request did not contain any field that can be changed.
    #[error("the update contained no recognised fields, expected any of title, amount, type, category")]
    EmptyPatch,

    /// A field that must hold text held another JSON type.
    #[error("invalid {field} {value}, expected a string")]
    NotText {
        /// The name of the field on the wire.
        field: &'static str,
        /// The JSON value that was sent.
        value: String,
    },

    /// The request body could not be parsed as the expected JSON object.
    #[error("invalid request body: {0}")]
    MalformedBody(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::Storage(error.to_string())
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => Error::PayloadTooLarge,
            _ => Error::Validation(ValidationError::MalformedBody(rejection.body_text())),
        }
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error = match self {
            // Storage details are not intended to be shown to the client.
            Error::Storage(cause) => {
                tracing::error!("A storage error occurred: {cause}");
                "the transaction store is unavailable, try again later".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

//! Defines the core data models for transactions and the validation of
//! client input into those models.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::ValidationError;

/// The category given to transactions created without one.
pub const DEFAULT_CATEGORY: &str = "other";

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(ValidationError::InvalidType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: ValidationError| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The store-assigned ID of the transaction.
    pub id: String,
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money earned or spent, never negative.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// A free-form grouping such as "food" or "rent".
    pub category: String,
    /// When the store recorded the transaction.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// A validated transaction that has not been stored yet.
///
/// There is no date here: the store stamps the creation time itself.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A non-empty description.
    pub title: String,
    /// A finite, non-negative amount.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub kind: TransactionType,
    /// The category, already defaulted.
    pub category: String,
}

/// A validated, non-empty set of changes to apply to a stored transaction.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement amount.
    pub amount: Option<f64>,
    /// Replacement type.
    pub kind: Option<TransactionType>,
    /// Replacement category.
    pub category: Option<String>,
}

impl TransactionPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.kind.is_none()
            && self.category.is_none()
    }
}

// ============================================================================
// REQUEST PAYLOADS
// ============================================================================

/// An amount as sent by a client, either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// e.g. `3.5`
    Number(f64),
    /// e.g. `"3.5"`
    Text(String),
    /// Any other JSON value, which is never a valid amount.
    Other(Value),
}

impl AmountInput {
    /// Read the amount as a finite, non-negative number.
    pub fn parse(&self) -> Result<f64, ValidationError> {
        let (amount, raw) = match self {
            Self::Number(number) => (Some(*number), number.to_string()),
            Self::Text(text) => (text.trim().parse::<f64>().ok(), text.clone()),
            Self::Other(value) => (None, value.to_string()),
        };

        match amount {
            Some(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
            _ => Err(ValidationError::InvalidAmount(raw)),
        }
    }
}

/// The JSON body for creating a transaction.
///
/// Every field is optional and loosely typed at the parsing stage so that
/// missing fields are reported before any other problem, rather than as
/// deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTransactionRequest {
    /// Required text.
    pub title: Option<Value>,
    /// Required.
    pub amount: Option<AmountInput>,
    /// Required, either "income" or "expense".
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    /// Defaults to [DEFAULT_CATEGORY].
    pub category: Option<Value>,
}

impl CreateTransactionRequest {
    /// Validate the request into a [NewTransaction].
    ///
    /// Checks run in order: required fields, then type, then amount.
    ///
    /// # Errors
    /// Returns a [ValidationError] describing the first failed check.
    pub fn validate(self) -> Result<NewTransaction, ValidationError> {
        let title = self.title.filter(|title| !is_blank(title));

        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if self.amount.is_none() {
            missing.push("amount");
        }
        if self.kind.is_none() {
            missing.push("type");
        }

        let (Some(title), Some(amount), Some(kind)) = (title, self.amount, self.kind) else {
            return Err(ValidationError::MissingFields(missing));
        };

        let title = into_text("title", title)?;
        let kind = parse_kind(kind)?;
        let amount = amount.parse()?;

        Ok(NewTransaction {
            title,
            amount,
            kind,
            category: resolve_category(self.category)?,
        })
    }
}

/// The JSON body for updating a transaction.
///
/// Unknown fields, including `id` and `date`, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Replacement title, must be non-blank text.
    pub title: Option<Value>,
    /// Replacement amount.
    pub amount: Option<AmountInput>,
    /// Replacement type.
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    /// Replacement category, blank resets it to [DEFAULT_CATEGORY].
    pub category: Option<Value>,
}

impl UpdateTransactionRequest {
    /// Validate each supplied field into a [TransactionPatch].
    ///
    /// # Errors
    /// Returns [ValidationError::EmptyPatch] if no field was supplied, or the
    /// error for the first field that fails validation.
    pub fn into_patch(self) -> Result<TransactionPatch, ValidationError> {
        let title = match self.title {
            Some(title) if is_blank(&title) => return Err(ValidationError::EmptyTitle),
            title => title.map(|title| into_text("title", title)).transpose()?,
        };
        let kind = self.kind.map(parse_kind).transpose()?;
        let amount = self.amount.map(|amount| amount.parse()).transpose()?;
        let category = match self.category {
            Some(category) => Some(resolve_category(Some(category))?),
            None => None,
        };

        let patch = TransactionPatch {
            title,
            amount,
            kind,
            category,
        };

        if patch.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }

        Ok(patch)
    }
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(text) if text.trim().is_empty())
}

fn into_text(field: &'static str, value: Value) -> Result<String, ValidationError> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(ValidationError::NotText {
            field,
            value: other.to_string(),
        }),
    }
}

fn parse_kind(value: Value) -> Result<TransactionType, ValidationError> {
    match value {
        Value::String(text) => text.parse(),
        other => Err(ValidationError::InvalidType(other.to_string())),
    }
}

fn resolve_category(category: Option<Value>) -> Result<String, ValidationError> {
    match category {
        Some(category) if !is_blank(&category) => into_text("category", category),
        _ => Ok(DEFAULT_CATEGORY.to_owned()),
    }
}

// ============================================================================
// TESTS
// ============================================================================

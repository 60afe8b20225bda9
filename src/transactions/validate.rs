//! Validation and normalization of incoming transactions.
//!
//! Checks run in a fixed order and stop at the first failure:
//! description, amount, kind, category, then date. Identity and creation
//! timestamps are not assigned here; see [`NormalizedTransaction::into_transaction`].

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    UtcOffset,
};
use uuid::Uuid;

use super::repo_types::{Kind, Transaction, DEFAULT_PAYMENT_METHOD};
use crate::{categories::repo_types::Category, money::cents_from_f64};

pub const MIN_DESCRIPTION_LEN: usize = 2;
/// Largest accepted amount (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("description must have at least 2 characters")]
    InvalidDescription,
    #[error("amount must be a positive number no greater than 1000000000000")]
    InvalidAmount,
    #[error("kind must be income or expense")]
    InvalidKind,
    #[error("category does not exist")]
    InvalidCategory,
    #[error("date must be an RFC 3339 timestamp or YYYY-MM-DD")]
    InvalidDate,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidDescription => "INVALID_DESCRIPTION",
            ValidationError::InvalidAmount => "INVALID_AMOUNT",
            ValidationError::InvalidKind => "INVALID_KIND",
            ValidationError::InvalidCategory => "INVALID_CATEGORY",
            ValidationError::InvalidDate => "INVALID_DATE",
        }
    }
}

/// Raw request body. Every field is an untyped JSON value so a value of the
/// wrong type fails with that field's own code instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionInput {
    pub description: Option<Value>,
    pub amount: Option<Value>,
    #[serde(alias = "type")]
    pub kind: Option<Value>,
    #[serde(alias = "category")]
    pub category_id: Option<Value>,
    pub date: Option<Value>,
    pub payment_method: Option<Value>,
    pub tags: Option<Value>,
}

fn text(field: &Option<Value>) -> Option<&str> {
    field.as_ref().and_then(Value::as_str)
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTransaction {
    pub description: String,
    pub amount: Decimal,
    pub kind: Kind,
    pub category_id: String,
    pub date: OffsetDateTime,
    pub payment_method: String,
    pub tags: Vec<String>,
}

impl NormalizedTransaction {
    pub fn into_transaction(
        self,
        id: Uuid,
        owner_id: Uuid,
        created_at: OffsetDateTime,
    ) -> Transaction {
        Transaction {
            id,
            owner_id,
            description: self.description,
            amount: self.amount,
            kind: self.kind,
            category_id: self.category_id,
            date: self.date,
            payment_method: self.payment_method,
            tags: self.tags,
            created_at,
            updated_at: created_at,
        }
    }
}

/// `received_at` stands in for a missing `date`.
pub fn validate(
    input: &TransactionInput,
    categories: &[Category],
    received_at: OffsetDateTime,
) -> Result<NormalizedTransaction, ValidationError> {
    let description = text(&input.description)
        .map(str::trim)
        .filter(|d| d.chars().count() >= MIN_DESCRIPTION_LEN)
        .ok_or(ValidationError::InvalidDescription)?;

    let amount = input
        .amount
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|a| *a > 0.0)
        .and_then(cents_from_f64)
        .filter(|a| !a.is_zero() && *a <= MAX_AMOUNT)
        .ok_or(ValidationError::InvalidAmount)?;

    let kind = text(&input.kind)
        .and_then(Kind::parse)
        .ok_or(ValidationError::InvalidKind)?;

    let category = text(&input.category_id)
        .and_then(|id| Category::find(categories, id))
        .ok_or(ValidationError::InvalidCategory)?;

    let date = match &input.date {
        None | Some(Value::Null) => received_at.to_offset(UtcOffset::UTC),
        Some(Value::String(raw)) if raw.trim().is_empty() => received_at.to_offset(UtcOffset::UTC),
        Some(Value::String(raw)) => parse_date(raw.trim())?,
        Some(_) => return Err(ValidationError::InvalidDate),
    };

    let payment_method = text(&input.payment_method)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PAYMENT_METHOD)
        .to_string();

    Ok(NormalizedTransaction {
        description: description.to_string(),
        amount,
        kind,
        category_id: category.id.clone(),
        date,
        payment_method,
        tags: tags(&input.tags),
    })
}

/// Keeps the string entries of a `tags` array; anything else is no tags.
fn tags(field: &Option<Value>) -> Vec<String> {
    match field {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Parses RFC 3339 or a bare `YYYY-MM-DD` (UTC midnight); result is in UTC.
pub fn parse_date(raw: &str) -> Result<OffsetDateTime, ValidationError> {
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(at.to_offset(UtcOffset::UTC));
    }
    let day = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &day)
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| ValidationError::InvalidDate)
}

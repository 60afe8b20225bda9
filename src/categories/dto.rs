use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;

use super::repo_types::Category;
use crate::transactions::repo_types::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub transaction_count: usize,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_used: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct CategoryWithStats {
    #[serde(flatten)]
    pub category: Category,
    pub stats: UsageStats,
}

impl UsageStats {
    /// All-time usage of `category_id` within `transactions`.
    pub fn of(transactions: &[Transaction], category_id: &str) -> Self {
        transactions
            .iter()
            .filter(|t| t.category_id == category_id)
            .fold(
                UsageStats {
                    total_amount: Decimal::ZERO,
                    transaction_count: 0,
                    last_used: None,
                },
                |mut acc, t| {
                    acc.total_amount = acc.total_amount.saturating_add(t.amount);
                    acc.transaction_count += 1;
                    acc.last_used = acc.last_used.max(Some(t.date));
                    acc
                },
            )
    }
}

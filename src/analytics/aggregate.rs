//! Monthly totals, per-category breakdowns and trailing trends.
//!
//! All functions are total: empty input produces zeroed figures, never an error,
//! and sums saturate at `Decimal::MAX` instead of overflowing.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use time::UtcOffset;

use super::period::Period;
use crate::{
    categories::repo_types::Category,
    money::round_cents,
    transactions::repo_types::{Kind, Transaction},
};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyOverview {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl MonthlyOverview {
    fn from_totals(total_income: Decimal, total_expense: Decimal) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income.saturating_sub(total_expense),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: String,
    pub name: String,
    pub kind: Kind,
    pub color: String,
    pub icon: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub count: usize,
    /// Share of the same-kind total, in percent, rounded to cents.
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Transactions dated inside `period` at `offset`.
pub fn in_period(
    transactions: &[Transaction],
    period: Period,
    offset: UtcOffset,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| period.contains(t.date, offset))
        .cloned()
        .collect()
}

pub fn monthly_overview(
    transactions: &[Transaction],
    period: Period,
    offset: UtcOffset,
) -> MonthlyOverview {
    let (income, expense) = transactions
        .iter()
        .filter(|t| period.contains(t.date, offset))
        .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), t| match t.kind {
            Kind::Income => (inc.saturating_add(t.amount), exp),
            Kind::Expense => (inc, exp.saturating_add(t.amount)),
        });
    MonthlyOverview::from_totals(income, expense)
}

/// One entry per category, in category order. Percentages are scoped to the
/// category's kind; a kind whose total is zero reports 0% everywhere.
/// Transactions pointing at unknown categories are ignored.
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryBreakdown> {
    let mut per_category: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for tx in transactions {
        let entry = per_category
            .entry(tx.category_id.as_str())
            .or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.saturating_add(tx.amount);
        entry.1 += 1;
    }

    let totals: Vec<(Decimal, usize)> = categories
        .iter()
        .map(|c| {
            per_category
                .get(c.id.as_str())
                .copied()
                .unwrap_or((Decimal::ZERO, 0))
        })
        .collect();

    let kind_total = |kind: Kind| -> Decimal {
        categories
            .iter()
            .zip(&totals)
            .filter(|(c, _)| c.kind == kind)
            .fold(Decimal::ZERO, |acc, (_, (total, _))| acc.saturating_add(*total))
    };
    let income_total = kind_total(Kind::Income);
    let expense_total = kind_total(Kind::Expense);

    categories
        .iter()
        .zip(totals)
        .map(|(category, (total, count))| {
            let denominator = match category.kind {
                Kind::Income => income_total,
                Kind::Expense => expense_total,
            };
            let percentage = total
                .checked_div(denominator)
                .and_then(|share| share.checked_mul(HUNDRED))
                .map(round_cents)
                .unwrap_or(Decimal::ZERO);
            CategoryBreakdown {
                category_id: category.id.clone(),
                name: category.name.clone(),
                kind: category.kind,
                color: category.color.clone(),
                icon: category.icon.clone(),
                total,
                count,
                percentage,
            }
        })
        .collect()
}

/// Exactly `months_back` entries ending at `current`, oldest first.
pub fn trailing_trend(
    transactions: &[Transaction],
    current: Period,
    months_back: usize,
    offset: UtcOffset,
) -> Vec<TrendPoint> {
    current
        .trailing(months_back)
        .into_iter()
        .map(|period| {
            let overview = monthly_overview(transactions, period, offset);
            TrendPoint {
                period: period.to_string(),
                income: overview.total_income,
                expense: overview.total_expense,
                balance: overview.balance,
            }
        })
        .collect()
}

use rust_decimal::Decimal;
use serde::Serialize;
use time::UtcOffset;

use super::{
    aggregate::{
        category_breakdown, in_period, monthly_overview, trailing_trend, CategoryBreakdown,
        TrendPoint,
    },
    insights::{generate, potential_savings, summarize, Insight, InsightSummary, MonthSnapshot},
    period::Period,
};
use crate::{
    categories::repo_types::Category, money::round_cents, transactions::repo_types::Transaction,
};

pub const TREND_MONTHS: usize = 6;
/// Naive next-month projection: this month's expenses plus 5%.
const NEXT_MONTH_FACTOR: Decimal = Decimal::from_parts(105, 0, 0, false, 2);
/// Balance above this share of expenses counts as excellent health.
const HEALTHY_BALANCE_SHARE: Decimal = Decimal::from_parts(3, 0, 0, false, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialHealth {
    Excellent,
    Good,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewCard {
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    pub transactions_count: usize,
    pub financial_health: FinancialHealth,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Predictions {
    #[serde(with = "rust_decimal::serde::float")]
    pub next_month_expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub savings_opportunity: Decimal,
    pub trend: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub period: String,
    pub overview: OverviewCard,
    pub category_analysis: Vec<CategoryBreakdown>,
    pub monthly_trends: Vec<TrendPoint>,
    pub predictions: Predictions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsReport {
    pub insights: Vec<Insight>,
    pub summary: InsightSummary,
}

fn health(balance: Decimal, expense: Decimal) -> FinancialHealth {
    if balance > expense.saturating_mul(HEALTHY_BALANCE_SHARE) {
        FinancialHealth::Excellent
    } else if balance > Decimal::ZERO {
        FinancialHealth::Good
    } else {
        FinancialHealth::Warning
    }
}

fn snapshot(
    transactions: &[Transaction],
    categories: &[Category],
    period: Period,
    offset: UtcOffset,
) -> (MonthSnapshot, usize) {
    let monthly = in_period(transactions, period, offset);
    let snapshot = MonthSnapshot {
        overview: monthly_overview(&monthly, period, offset),
        categories: category_breakdown(&monthly, categories),
    };
    (snapshot, monthly.len())
}

/// Dashboard for `current`, built from one account's transactions.
pub fn build_overview(
    transactions: &[Transaction],
    categories: &[Category],
    current: Period,
    offset: UtcOffset,
) -> DashboardOverview {
    let (month, count) = snapshot(transactions, categories, current, offset);
    let MonthSnapshot {
        overview,
        categories: breakdown,
    } = month;

    let monthly_trends = trailing_trend(transactions, current, TREND_MONTHS, offset);
    let previous_expense = monthly_trends
        .len()
        .checked_sub(2)
        .map(|i| monthly_trends[i].expense);
    let trend = match previous_expense {
        Some(prev) if overview.total_expense > prev => Direction::Up,
        _ => Direction::Down,
    };

    DashboardOverview {
        period: current.to_string(),
        overview: OverviewCard {
            balance: overview.balance,
            total_income: overview.total_income,
            total_expense: overview.total_expense,
            transactions_count: count,
            financial_health: health(overview.balance, overview.total_expense),
        },
        category_analysis: breakdown
            .into_iter()
            .filter(|c| !c.total.is_zero())
            .collect(),
        monthly_trends,
        predictions: Predictions {
            next_month_expense: round_cents(
                overview.total_expense.saturating_mul(NEXT_MONTH_FACTOR),
            ),
            savings_opportunity: potential_savings(&overview),
            trend,
        },
    }
}

/// Insights for `current` measured against the month before it.
pub fn build_insights(
    transactions: &[Transaction],
    categories: &[Category],
    current: Period,
    offset: UtcOffset,
) -> InsightsReport {
    let (month, _) = snapshot(transactions, categories, current, offset);
    let previous = monthly_overview(transactions, current.previous(), offset);
    InsightsReport {
        insights: generate(&month, &previous),
        summary: summarize(&month, &previous),
    }
}

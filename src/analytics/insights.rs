//! Canned advisory messages derived from monthly figures.
//!
//! Rules are evaluated in a fixed order and that order is the display order:
//! spending growth warning, largest expense category, savings opportunity.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::aggregate::{CategoryBreakdown, MonthlyOverview};
use crate::{money::round_cents, transactions::repo_types::Kind};

/// Month-over-month expense growth above which a warning is raised (20%).
const GROWTH_WARNING_THRESHOLD: Decimal = Decimal::from_parts(20, 0, 0, false, 2);
/// Share of this month's expenses suggested as a saving target (15%).
pub const SAVINGS_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    #[allow(dead_code)]
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    pub suggestion: String,
    pub icon: &'static str,
    pub priority: Priority,
}

/// A month's totals together with its category breakdown.
#[derive(Debug, Clone, Default)]
pub struct MonthSnapshot {
    pub overview: MonthlyOverview,
    pub categories: Vec<CategoryBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategory {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub current_expenses: Decimal,
    /// Percent change against the previous month; 0 when there is no baseline.
    #[serde(with = "rust_decimal::serde::float")]
    pub expense_change: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub potential_savings: Decimal,
    pub top_category: Option<TopCategory>,
}

/// Growth ratio (0.3 == +30%), or `None` when the previous month spent nothing.
/// Ratios too large to represent saturate at `Decimal::MAX`.
fn expense_growth(current: &MonthlyOverview, previous: &MonthlyOverview) -> Option<Decimal> {
    if previous.total_expense.is_zero() {
        return None;
    }
    let delta = current.total_expense.saturating_sub(previous.total_expense);
    Some(delta.checked_div(previous.total_expense).unwrap_or(Decimal::MAX))
}

/// Expense category with the largest nonzero total; ties keep the earliest.
pub fn largest_expense(categories: &[CategoryBreakdown]) -> Option<&CategoryBreakdown> {
    categories
        .iter()
        .filter(|c| c.kind == Kind::Expense && c.total > Decimal::ZERO)
        .fold(None, |best: Option<&CategoryBreakdown>, c| match best {
            Some(b) if b.total >= c.total => Some(b),
            _ => Some(c),
        })
}

pub fn potential_savings(current: &MonthlyOverview) -> Decimal {
    round_cents(current.total_expense.saturating_mul(SAVINGS_RATE))
}

pub fn generate(current: &MonthSnapshot, previous: &MonthlyOverview) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(3);

    if let Some(growth) = expense_growth(&current.overview, previous) {
        if growth > GROWTH_WARNING_THRESHOLD {
            let percent = growth
                .saturating_mul(Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            insights.push(Insight {
                kind: InsightKind::Warning,
                title: "Watch your spending".into(),
                message: format!("Your expenses rose {percent:.1}% compared with last month"),
                suggestion: "Review the category that grew the most".into(),
                icon: "exclamation-triangle",
                priority: Priority::High,
            });
        }
    }

    if let Some(top) = largest_expense(&current.categories) {
        insights.push(Insight {
            kind: InsightKind::Info,
            title: "Largest expense".into(),
            message: format!("Your largest expense is {}", top.name),
            suggestion: "Consider trimming spending in this category".into(),
            icon: "chart-pie",
            priority: Priority::Medium,
        });
    }

    insights.push(Insight {
        kind: InsightKind::Success,
        title: "Savings opportunity".into(),
        message: format!(
            "You could save up to {:.2} this month",
            potential_savings(&current.overview)
        ),
        suggestion: "Cut non-essential spending by 15%".into(),
        icon: "piggy-bank",
        priority: Priority::Medium,
    });

    insights
}

pub fn summarize(current: &MonthSnapshot, previous: &MonthlyOverview) -> InsightSummary {
    let expense_change = expense_growth(&current.overview, previous)
        .map(|g| round_cents(g.saturating_mul(Decimal::ONE_HUNDRED)))
        .unwrap_or(Decimal::ZERO);
    InsightSummary {
        current_expenses: current.overview.total_expense,
        expense_change,
        potential_savings: potential_savings(&current.overview),
        top_category: largest_expense(&current.categories).map(|c| TopCategory {
            name: c.name.clone(),
            amount: c.total,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn spent(expense: &str) -> MonthlyOverview {
        MonthlyOverview {
            total_income: Decimal::ZERO,
            total_expense: dec(expense),
            balance: -dec(expense),
        }
    }

    fn row(id: &str, kind: Kind, total: &str) -> CategoryBreakdown {
        CategoryBreakdown {
            category_id: id.into(),
            name: id.to_uppercase(),
            kind,
            color: "#000000".into(),
            icon: "circle".into(),
            total: dec(total),
            count: 1,
            percentage: Decimal::ZERO,
        }
    }

    fn snapshot(expense: &str, categories: Vec<CategoryBreakdown>) -> MonthSnapshot {
        MonthSnapshot {
            overview: spent(expense),
            categories,
        }
    }

    #[test]
    fn thirty_percent_growth_warns_first() {
        let current = snapshot("1300", vec![row("food", Kind::Expense, "1300")]);

        let insights = generate(&current, &spent("1000"));

        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[0].priority, Priority::High);
        assert!(insights[0].message.contains("30.0%"), "{}", insights[0].message);
        assert_eq!(insights[1].kind, InsightKind::Info);
        assert_eq!(insights[2].kind, InsightKind::Success);
    }

    #[test]
    fn growth_at_threshold_does_not_warn() {
        let insights = generate(&snapshot("1200", vec![]), &spent("1000"));
        assert!(insights.iter().all(|i| i.kind != InsightKind::Warning));
    }

    #[test]
    fn no_baseline_never_warns() {
        let insights = generate(&snapshot("5000", vec![]), &spent("0"));
        assert!(insights.iter().all(|i| i.kind != InsightKind::Warning));
        let summary = summarize(&snapshot("5000", vec![]), &spent("0"));
        assert_eq!(summary.expense_change, Decimal::ZERO);
    }

    #[test]
    fn largest_expense_names_the_top_category() {
        let current = snapshot(
            "300",
            vec![
                row("salary", Kind::Income, "9000"),
                row("food", Kind::Expense, "100"),
                row("housing", Kind::Expense, "200"),
            ],
        );

        let insights = generate(&current, &spent("300"));

        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].kind, InsightKind::Info);
        assert!(insights[0].message.ends_with("HOUSING"));
    }

    #[test]
    fn largest_expense_ties_keep_enumeration_order() {
        let rows = vec![
            row("transport", Kind::Expense, "50"),
            row("food", Kind::Expense, "50"),
        ];
        assert_eq!(largest_expense(&rows).unwrap().category_id, "transport");
    }

    #[test]
    fn zero_expense_categories_are_not_reported() {
        let current = snapshot("0", vec![row("food", Kind::Expense, "0")]);

        let insights = generate(&current, &spent("0"));

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Success);
        assert_eq!(insights[0].message, "You could save up to 0.00 this month");
    }

    #[test]
    fn savings_are_fifteen_percent() {
        let insights = generate(&snapshot("130", vec![]), &spent("0"));
        assert_eq!(insights[0].message, "You could save up to 19.50 this month");
    }

    #[test]
    fn priorities_serialize_lowercase() {
        let names: Vec<String> = [Priority::High, Priority::Medium, Priority::Low]
            .iter()
            .map(|p| serde_json::to_string(p).unwrap())
            .collect();
        assert_eq!(names, [r#""high""#, r#""medium""#, r#""low""#]);
    }

    #[test]
    fn extreme_growth_saturates_instead_of_overflowing() {
        let current = snapshot(
            "1000000000000000000000000000",
            vec![row("food", Kind::Expense, "1000000000000000000000000000")],
        );
        let previous = spent("0.01");

        let insights = generate(&current, &previous);
        let summary = summarize(&current, &previous);

        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(summary.expense_change, Decimal::MAX);
        assert_eq!(summary.potential_savings, dec("150000000000000000000000000"));
    }

    #[test]
    fn summary_reports_change_and_top_category() {
        let current = snapshot("1300", vec![row("food", Kind::Expense, "1300")]);

        let summary = summarize(&current, &spent("1000"));

        assert_eq!(summary.current_expenses, dec("1300"));
        assert_eq!(summary.expense_change, dec("30"));
        assert_eq!(summary.potential_savings, dec("195"));
        assert_eq!(
            summary.top_category,
            Some(TopCategory {
                name: "FOOD".into(),
                amount: dec("1300"),
            })
        );
    }
}

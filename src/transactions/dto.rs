use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};

use super::{
    repo::{ListFilter, ListPage},
    repo_types::{Kind, Transaction},
    validate::{parse_date, ValidationError},
};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    #[serde(alias = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Blank parameters are ignored. A bare `endDate` day is inclusive.
    pub fn filter(&self) -> Result<ListFilter, ValidationError> {
        let kind = match non_blank(&self.kind) {
            Some(raw) => Some(Kind::parse(raw).ok_or(ValidationError::InvalidKind)?),
            None => None,
        };
        let start = non_blank(&self.start_date).map(parse_date).transpose()?;
        let end = non_blank(&self.end_date).map(parse_end).transpose()?;

        Ok(ListFilter {
            kind,
            category_id: non_blank(&self.category).map(str::to_string),
            start,
            end,
        })
    }
}

fn non_blank(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_end(raw: &str) -> Result<OffsetDateTime, ValidationError> {
    let at = parse_date(raw)?;
    if OffsetDateTime::parse(raw, &Rfc3339).is_ok() {
        Ok(at)
    } else {
        Ok(at + Duration::days(1) - Duration::nanoseconds(1))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStats {
    pub total: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    pub page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct TransactionsPage {
    pub transactions: Vec<Transaction>,
    pub stats: ListStats,
}

impl From<ListPage> for TransactionsPage {
    fn from(page: ListPage) -> Self {
        Self {
            transactions: page.transactions,
            stats: ListStats {
                total: page.total,
                total_income: page.total_income,
                total_expense: page.total_expense,
                page: page.page,
                total_pages: page.total_pages,
            },
        }
    }
}

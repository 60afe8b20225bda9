use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Kind, Transaction};
use crate::{auth::repo_types::Account, db::Document, money::round_cents};

/// Share of each income credited to the owner's `totalSaved`.
const SAVED_SHARE_OF_INCOME: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

/// The owner's transactions, in document order.
pub fn owned_by(transactions: Vec<Transaction>, owner_id: Uuid) -> Vec<Transaction> {
    transactions
        .into_iter()
        .filter(|t| t.owner_id == owner_id)
        .collect()
}

/// Appends `tx` and updates its owner's stats. Returns `None` when the owner
/// account does not exist; nothing is modified in that case.
pub fn insert(doc: &mut Document, tx: Transaction) -> Option<&Transaction> {
    let account = Account::find_by_id_mut(doc, tx.owner_id)?;
    account.stats.total_transactions += 1;
    if tx.kind == Kind::Income {
        let credit = tx.amount.saturating_mul(SAVED_SHARE_OF_INCOME);
        account.stats.total_saved = round_cents(account.stats.total_saved.saturating_add(credit));
    }
    doc.transactions.push(tx);
    doc.transactions.last()
}

/// Filters for listing; every field is optional.
#[derive(Debug, Default, Clone)]
pub struct ListFilter {
    pub kind: Option<Kind>,
    pub category_id: Option<String>,
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
}

impl ListFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.kind.map_or(true, |k| tx.kind == k)
            && self
                .category_id
                .as_deref()
                .map_or(true, |c| tx.category_id == c)
            && self.start.map_or(true, |s| tx.date >= s)
            && self.end.map_or(true, |e| tx.date <= e)
    }
}

/// One page of a filtered listing plus totals over the whole filtered set.
#[derive(Debug)]
pub struct ListPage {
    pub transactions: Vec<Transaction>,
    pub total: usize,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub page: usize,
    pub total_pages: usize,
}

/// Newest first; `page` is 1-based.
pub fn list(
    transactions: Vec<Transaction>,
    filter: &ListFilter,
    page: usize,
    limit: usize,
) -> ListPage {
    let page = page.max(1);
    let limit = limit.max(1);

    let mut matching: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| filter.matches(t))
        .collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));

    let sum = |kind: Kind| -> Decimal {
        matching
            .iter()
            .filter(|t| t.kind == kind)
            .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
    };
    let total_income = sum(Kind::Income);
    let total_expense = sum(Kind::Expense);
    let total = matching.len();

    let transactions = matching
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    ListPage {
        transactions,
        total,
        total_income,
        total_expense,
        page,
        total_pages: total.div_ceil(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::repo_types::DEFAULT_PAYMENT_METHOD;
    use std::str::FromStr;
    use time::macros::datetime;

    fn tx(
        owner: Uuid,
        kind: Kind,
        amount: &str,
        category: &str,
        date: OffsetDateTime,
    ) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            owner_id: owner,
            description: format!("{kind} {amount}"),
            amount: Decimal::from_str(amount).unwrap(),
            kind,
            category_id: category.into(),
            date,
            payment_method: DEFAULT_PAYMENT_METHOD.into(),
            tags: vec![],
            created_at: date,
            updated_at: date,
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn owned_by_drops_other_accounts() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let at = datetime!(2024-01-01 0:00 UTC);
        let all = vec![
            tx(me, Kind::Expense, "10", "food", at),
            tx(other, Kind::Expense, "20", "food", at),
        ];
        let mine = owned_by(all, me);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].owner_id, me);
    }

    #[test]
    fn insert_updates_owner_stats() {
        let mut doc = Document::seeded();
        let at = datetime!(2024-01-01 0:00 UTC);
        let owner = Account::create(&mut doc, "Ana", "ana@example.com", "hash", at).id;

        insert(&mut doc, tx(owner, Kind::Income, "1000.55", "salary", at)).unwrap();
        insert(&mut doc, tx(owner, Kind::Expense, "40", "food", at)).unwrap();

        let stats = &Account::find_by_id(&doc, owner).unwrap().stats;
        assert_eq!(stats.total_transactions, 2);
        assert_eq!(stats.total_saved, dec("200.11"));
        assert_eq!(doc.transactions.len(), 2);
    }

    #[test]
    fn insert_without_owner_changes_nothing() {
        let mut doc = Document::seeded();
        let at = datetime!(2024-01-01 0:00 UTC);
        let orphan = tx(Uuid::new_v4(), Kind::Expense, "5", "food", at);
        assert!(insert(&mut doc, orphan).is_none());
        assert!(doc.transactions.is_empty());
    }

    #[test]
    fn list_filters_sorts_and_paginates() {
        let me = Uuid::new_v4();
        let all: Vec<Transaction> = (1..=5)
            .map(|day| {
                let date = datetime!(2024-03-01 12:00 UTC) + time::Duration::days(day);
                tx(me, Kind::Expense, "10", "food", date)
            })
            .chain([tx(me, Kind::Income, "500", "salary", datetime!(2024-03-03 12:00 UTC))])
            .collect();

        let page = list(all.clone(), &ListFilter::default(), 1, 4);
        assert_eq!(page.total, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.transactions.len(), 4);
        assert_eq!(page.total_income, dec("500"));
        assert_eq!(page.total_expense, dec("50"));
        assert!(page.transactions.windows(2).all(|w| w[0].date >= w[1].date));

        let second = list(all.clone(), &ListFilter::default(), 2, 4);
        assert_eq!(second.transactions.len(), 2);

        let expenses_in_window = ListFilter {
            kind: Some(Kind::Expense),
            start: Some(datetime!(2024-03-03 0:00 UTC)),
            end: Some(datetime!(2024-03-04 23:59 UTC)),
            ..ListFilter::default()
        };
        let page = list(all.clone(), &expenses_in_window, 1, 20);
        assert_eq!(page.total, 2);
        assert_eq!(page.total_income, Decimal::ZERO);

        let by_category = ListFilter {
            category_id: Some("salary".into()),
            ..ListFilter::default()
        };
        assert_eq!(list(all, &by_category, 1, 20).total, 1);
    }

    #[test]
    fn list_of_nothing_has_zero_pages() {
        let page = list(vec![], &ListFilter::default(), 3, 20);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.transactions.is_empty());
    }
}

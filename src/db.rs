use serde::{Deserialize, Serialize};

use crate::{
    auth::repo_types::Account,
    categories::repo_types::{default_categories, Category},
    transactions::repo_types::Transaction,
};

/// Everything the service persists, read and written as one unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
}

impl Document {
    /// Empty document carrying the built-in category set.
    pub fn seeded() -> Self {
        Self {
            categories: default_categories(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_deserialize_as_empty() {
        let document: Document = serde_json::from_str(r#"{"categories": []}"#).unwrap();
        assert!(document.accounts.is_empty());
        assert!(document.transactions.is_empty());
    }

    #[test]
    fn seeded_document_has_both_kinds_of_category() {
        let document = Document::seeded();
        assert!(document.categories.iter().any(|c| c.id == "food"));
        assert!(document.categories.iter().any(|c| c.id == "salary"));
    }
}

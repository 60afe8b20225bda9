use serde::{Deserialize, Serialize};

use crate::transactions::repo_types::Kind;

/// Reference category; the set is fixed and not editable by users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: Kind,
    pub color: String,
    pub icon: String,
}

impl Category {
    fn new(id: &str, name: &str, kind: Kind, color: &str, icon: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            color: color.into(),
            icon: icon.into(),
        }
    }

    pub fn find<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.id == id)
    }
}

pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("food", "Food", Kind::Expense, "#f59e0b", "utensils"),
        Category::new("transport", "Transport", Kind::Expense, "#3b82f6", "car"),
        Category::new("entertainment", "Entertainment", Kind::Expense, "#ec4899", "film"),
        Category::new("education", "Education", Kind::Expense, "#10b981", "graduation-cap"),
        Category::new("health", "Health", Kind::Expense, "#ef4444", "heart"),
        Category::new("housing", "Housing", Kind::Expense, "#8b5cf6", "home"),
        Category::new("salary", "Salary", Kind::Income, "#10b981", "money-bill-wave"),
        Category::new("freelance", "Freelance", Kind::Income, "#6366f1", "laptop-code"),
        Category::new("investments", "Investments", Kind::Income, "#06b6d4", "chart-line"),
        Category::new("gifts", "Gifts", Kind::Income, "#d946ef", "gift"),
    ]
}

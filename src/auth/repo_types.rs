use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Account record in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,                // unique, stored lower-cased
    pub password_hash: String,        // Argon2 PHC string
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_login_at: OffsetDateTime,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub stats: AccountStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub currency: String,
    pub theme: String,
    pub notifications: bool,
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            currency: "BRL".into(),
            theme: "dark".into(),
            notifications: true,
            language: "pt-BR".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountStats {
    pub total_transactions: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_saved: Decimal,
    pub streak: u32,
}

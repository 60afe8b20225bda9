use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::repo_types::{Account, AccountStats, Preferences},
    db::Document,
};

impl Account {
    /// Find an account by (already normalized) email.
    pub fn find_by_email<'a>(doc: &'a Document, email: &str) -> Option<&'a Account> {
        doc.accounts.iter().find(|a| a.email == email)
    }

    pub fn find_by_id(doc: &Document, id: Uuid) -> Option<&Account> {
        doc.accounts.iter().find(|a| a.id == id)
    }

    pub fn find_by_id_mut(doc: &mut Document, id: Uuid) -> Option<&mut Account> {
        doc.accounts.iter_mut().find(|a| a.id == id)
    }

    /// Append a new account with zeroed stats. Email uniqueness is the caller's check.
    pub fn create(
        doc: &mut Document,
        name: &str,
        email: &str,
        password_hash: &str,
        now: OffsetDateTime,
    ) -> Account {
        let account = Account {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            last_login_at: now,
            preferences: Preferences::default(),
            stats: AccountStats::default(),
        };
        doc.accounts.push(account.clone());
        account
    }

    /// Stamp a successful login.
    pub fn record_login(&mut self, now: OffsetDateTime) {
        self.last_login_at = now;
        self.stats.streak += 1;
    }
}

use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;

use super::{
    dto::{LoginRequest, RegisterRequest},
    password::{check_strength, hash_password, verify_password, PasswordWeakness},
    repo_types::Account,
};
use crate::{db::Document, error::ApiError};

pub const NAME_LEN: std::ops::RangeInclusive<usize> = 2..=30;

/// Rejected registration input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("name must be between 2 and 30 characters")]
    InvalidName,
    #[error("email must be valid")]
    InvalidEmail,
    #[error("password must have at least 8 characters")]
    WeakPassword,
    #[error("password must mix uppercase letters, lowercase letters and digits")]
    PasswordComplexity,
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl RegistrationError {
    pub fn code(&self) -> &'static str {
        match self {
            RegistrationError::InvalidName => "INVALID_NAME",
            RegistrationError::InvalidEmail => "INVALID_EMAIL",
            RegistrationError::WeakPassword => "WEAK_PASSWORD",
            RegistrationError::PasswordComplexity => "PASSWORD_COMPLEXITY",
            RegistrationError::PasswordMismatch => "PASSWORD_MISMATCH",
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration input that passed every check.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Checks run in order; the first failure wins.
pub fn validate_registration(req: RegisterRequest) -> Result<ValidRegistration, RegistrationError> {
    let name = req.name.trim().to_string();
    if !NAME_LEN.contains(&name.chars().count()) {
        return Err(RegistrationError::InvalidName);
    }

    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        return Err(RegistrationError::InvalidEmail);
    }

    match check_strength(&req.password) {
        Ok(()) => {}
        Err(PasswordWeakness::TooShort) => return Err(RegistrationError::WeakPassword),
        Err(PasswordWeakness::MissingCharacterClass) => {
            return Err(RegistrationError::PasswordComplexity)
        }
    }

    if req.password != req.confirm_password {
        return Err(RegistrationError::PasswordMismatch);
    }

    Ok(ValidRegistration {
        name,
        email,
        password: req.password,
    })
}

/// Adds the account to `doc`; the caller persists.
pub fn register_account(
    doc: &mut Document,
    registration: ValidRegistration,
    now: OffsetDateTime,
) -> Result<Account, ApiError> {
    if Account::find_by_email(doc, &registration.email).is_some() {
        return Err(ApiError::EmailExists);
    }
    let hash = hash_password(&registration.password)?;
    Ok(Account::create(
        doc,
        &registration.name,
        &registration.email,
        &hash,
        now,
    ))
}

/// Verifies credentials and stamps the login on the matching account.
pub fn authenticate(
    doc: &mut Document,
    req: &LoginRequest,
    now: OffsetDateTime,
) -> Result<Account, ApiError> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::MissingCredentials);
    }

    let account = doc
        .accounts
        .iter_mut()
        .find(|a| a.email == email)
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&req.password, &account.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    account.record_login(now);
    Ok(account.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn request(name: &str, email: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn email_regex_accepts_and_rejects() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("spaces in@mail.com"));
        assert!(!is_valid_email("user@nodot"));
    }

    #[test]
    fn registration_is_normalized() {
        let valid = validate_registration(request(
            "  Ana  ",
            " Ana@Example.COM ",
            "Grana2024",
            "Grana2024",
        ))
        .unwrap();
        assert_eq!(valid.name, "Ana");
        assert_eq!(valid.email, "ana@example.com");
    }

    #[test]
    fn registration_checks_run_in_order() {
        let cases = [
            (request("A", "bad", "x", "y"), RegistrationError::InvalidName),
            (
                request(&"n".repeat(31), "ana@example.com", "Grana2024", "Grana2024"),
                RegistrationError::InvalidName,
            ),
            (request("Ana", "bad", "x", "y"), RegistrationError::InvalidEmail),
            (
                request("Ana", "ana@example.com", "Short1", "Short1"),
                RegistrationError::WeakPassword,
            ),
            (
                request("Ana", "ana@example.com", "lowercase1", "lowercase1"),
                RegistrationError::PasswordComplexity,
            ),
            (
                request("Ana", "ana@example.com", "Grana2024", "Grana2025"),
                RegistrationError::PasswordMismatch,
            ),
        ];
        for (req, expected) in cases {
            assert_eq!(validate_registration(req).unwrap_err(), expected);
        }
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let mut doc = Document::seeded();
        let now = datetime!(2024-05-01 10:00 UTC);
        let reg = || {
            validate_registration(request(
                "Ana",
                "ana@example.com",
                "Grana2024",
                "Grana2024",
            ))
            .unwrap()
        };

        register_account(&mut doc, reg(), now).unwrap();
        let err = register_account(&mut doc, reg(), now).unwrap_err();

        assert!(matches!(err, ApiError::EmailExists));
        assert_eq!(doc.accounts.len(), 1);
    }

    #[test]
    fn authenticate_updates_login_stats() {
        let mut doc = Document::seeded();
        let registered_at = datetime!(2024-05-01 10:00 UTC);
        let reg = validate_registration(request(
            "Ana",
            "ana@example.com",
            "Grana2024",
            "Grana2024",
        ))
        .unwrap();
        register_account(&mut doc, reg, registered_at).unwrap();

        let login_at = datetime!(2024-05-03 09:00 UTC);
        let login = LoginRequest {
            email: "ANA@example.com".into(),
            password: "Grana2024".into(),
        };
        let account = authenticate(&mut doc, &login, login_at).unwrap();

        assert_eq!(account.stats.streak, 1);
        assert_eq!(doc.accounts[0].last_login_at, login_at);
    }

    #[test]
    fn authenticate_rejects_bad_input() {
        let mut doc = Document::seeded();
        let now = datetime!(2024-05-01 10:00 UTC);
        let reg = validate_registration(request(
            "Ana",
            "ana@example.com",
            "Grana2024",
            "Grana2024",
        ))
        .unwrap();
        register_account(&mut doc, reg, now).unwrap();

        let missing = LoginRequest {
            email: "ana@example.com".into(),
            password: String::new(),
        };
        assert!(matches!(
            authenticate(&mut doc, &missing, now),
            Err(ApiError::MissingCredentials)
        ));

        let wrong = LoginRequest {
            email: "ana@example.com".into(),
            password: "Grana2025".into(),
        };
        assert!(matches!(
            authenticate(&mut doc, &wrong, now),
            Err(ApiError::InvalidCredentials)
        ));

        let unknown = LoginRequest {
            email: "bob@example.com".into(),
            password: "Grana2024".into(),
        };
        assert!(matches!(
            authenticate(&mut doc, &unknown, now),
            Err(ApiError::InvalidCredentials)
        ));
        assert_eq!(doc.accounts[0].stats.streak, 0);
    }
}

use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_file: PathBuf,
    /// Offset whose calendar fields define "this month" for the dashboard.
    pub utc_offset: UtcOffset,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_file = std::env::var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/database.json"));
        let utc_offset = match std::env::var("APP_UTC_OFFSET") {
            Ok(raw) => parse_utc_offset(&raw)?,
            Err(_) => UtcOffset::UTC,
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "granazero".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "granazero-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 30),
        };
        Ok(Self {
            data_file,
            utc_offset,
            jwt,
        })
    }
}

/// Parses offsets written as `+HH:MM` / `-HH:MM`.
pub fn parse_utc_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(raw.trim(), &format)
        .with_context(|| format!("APP_UTC_OFFSET {raw:?} is not a valid offset like -03:00"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn parses_signed_offsets() {
        assert_eq!(parse_utc_offset("-03:00").unwrap(), offset!(-3));
        assert_eq!(parse_utc_offset("+05:30").unwrap(), offset!(+5:30));
        assert_eq!(parse_utc_offset(" +00:00 ").unwrap(), UtcOffset::UTC);
    }

    #[test]
    fn rejects_garbage_offsets() {
        assert!(parse_utc_offset("brasilia").is_err());
        assert!(parse_utc_offset("3").is_err());
    }
}

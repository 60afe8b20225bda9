//! HS256 session tokens. An account receives a short-lived access token and a
//! longer-lived refresh token; both carry the account ID as `sub`.

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[cfg.issuer.as_str()]);
        validation.set_audience(&[cfg.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            validation,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::minutes(cfg.ttl_minutes.max(1)),
            refresh_ttl: Duration::minutes(cfg.refresh_ttl_minutes.max(1)),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl JwtKeys {
    fn issue(&self, account_id: Uuid, kind: TokenKind) -> anyhow::Result<String> {
        let issued_at = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: account_id,
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + ttl).unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = %account_id, ?kind, "token issued");
        Ok(token)
    }

    pub fn sign_pair(&self, account_id: Uuid) -> anyhow::Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue(account_id, TokenKind::Access)?,
            refresh_token: self.issue(account_id, TokenKind::Refresh)?,
        })
    }

    /// Checks signature, expiry, issuer and audience. The kind is not checked.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)?.claims;
        Ok(claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        anyhow::ensure!(claims.kind == TokenKind::Refresh, "expected a refresh token");
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str, issuer: &str) -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: "granazero-users".into(),
            ttl_minutes: 15,
            refresh_ttl_minutes: 60 * 24,
        })
    }

    #[test]
    fn pair_round_trips_with_distinct_lifetimes() {
        let keys = keys("s3cret", "granazero");
        let id = Uuid::new_v4();

        let pair = keys.sign_pair(id).unwrap();
        let access = keys.verify(&pair.access_token).unwrap();
        let refresh = keys.verify_refresh(&pair.refresh_token).unwrap();

        assert_eq!((access.sub, access.kind), (id, TokenKind::Access));
        assert_eq!(access.exp - access.iat, 15 * 60);
        assert_eq!(refresh.sub, id);
        assert_eq!(refresh.exp - refresh.iat, 24 * 60 * 60);
    }

    #[test]
    fn access_token_is_not_a_refresh_token() {
        let keys = keys("s3cret", "granazero");
        let pair = keys.sign_pair(Uuid::new_v4()).unwrap();
        let err = keys.verify_refresh(&pair.access_token).unwrap_err();
        assert!(err.to_string().contains("refresh"));
    }

    #[test]
    fn foreign_tokens_are_rejected() {
        let ours = keys("s3cret", "granazero");
        let token = ours.sign_pair(Uuid::new_v4()).unwrap().access_token;

        assert!(keys("s3cret", "someone-else").verify(&token).is_err());
        assert!(keys("other", "granazero").verify(&token).is_err());
        assert!(ours.verify("garbage").is_err());
    }
}

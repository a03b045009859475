use anyhow::Context;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::Claims;
use crate::config::JwtConfig;

/// Every reason a token can be rejected collapses into this.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid or expired token")]
pub struct InvalidToken;

/// Issues and verifies the bearer tokens handed out at signup and signin.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            algorithm: cfg.algorithm,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::minutes(cfg.ttl_minutes),
        }
    }

    /// Signs a token for `subject` that lives for the configured TTL.
    pub fn issue_default(&self, subject: Uuid, role: Option<&str>) -> anyhow::Result<String> {
        self.issue(subject, role, self.ttl)
    }

    pub fn issue(&self, subject: Uuid, role: Option<&str>, ttl: Duration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now
            .checked_add(ttl)
            .context("token expiry is out of range")?;
        let claims = Claims {
            sub: subject,
            role: role.map(str::to_owned),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)?;
        debug!(user_id = %subject, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, InvalidToken> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            InvalidToken
        })?;

        // The library accepts a token during its expiry second; we do not.
        if data.claims.exp <= OffsetDateTime::now_utc().unix_timestamp() {
            debug!(user_id = %data.claims.sub, "jwt expired");
            return Err(InvalidToken);
        }
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

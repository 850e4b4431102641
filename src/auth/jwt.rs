use std::time::Duration;

use anyhow::Context;
use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{auth::claims::Claims, config::JwtConfig, error::AppError, state::AppState};

/// Signs and verifies session tokens with the process-wide HMAC secret.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64).saturating_mul(60)),
        }
    }

    pub fn issue(&self, user_id: i64, email: &str) -> anyhow::Result<String> {
        self.issue_at(user_id, email, OffsetDateTime::now_utc())
    }

    /// Signs a token as if it had been issued at `now`.
    pub fn issue_at(&self, user_id: i64, email: &str, now: OffsetDateTime) -> anyhow::Result<String> {
        let ttl = TimeDuration::try_from(self.ttl).context("token ttl out of range")?;
        let exp = now.checked_add(ttl).context("token expiry out of range")?;
        let claims = Claims {
            id: user_id,
            email: email.to_string(),
            iat: now.unix_timestamp().max(0) as usize,
            exp: exp.unix_timestamp().max(0) as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    /// Checks signature, issuer, audience and expiry. No leeway on `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = data.claims.id, "jwt verified");
                Ok(data.claims)
            }
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TTL_MINUTES;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: DEFAULT_TTL_MINUTES,
        })
    }

    #[test]
    fn issued_token_decodes_to_same_identity() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let token = keys.issue(42, "ann@x.com").expect("sign");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.id, 42);
        assert_eq!(claims.email, "ann@x.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[test]
    fn expiry_is_seven_days_after_issue() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let token = keys.issue(1, "a@b.co").unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn oversized_ttl_fails_to_sign_instead_of_panicking() {
        let base = make_keys("dev-secret", "iss", "aud");
        for minutes in [1_000_000_000_000, i64::MAX] {
            let keys = JwtKeys::from_config(&JwtConfig {
                secret: "dev-secret".into(),
                issuer: "iss".into(),
                audience: "aud".into(),
                ttl_minutes: minutes,
            });
            assert!(keys.issue(1, "a@b.co").is_err(), "{minutes}");
        }

        let keys = JwtKeys {
            ttl: Duration::from_secs(u64::MAX),
            ..base
        };
        assert!(keys.issue(1, "a@b.co").is_err());
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let ours = make_keys("our-secret", "iss", "aud");
        let theirs = make_keys("their-secret", "iss", "aud");
        let token = theirs.issue(1, "a@b.co").unwrap();
        assert!(matches!(ours.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected_even_with_valid_signature() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let long_ago = OffsetDateTime::now_utc() - TimeDuration::days(8);
        let token = keys.issue_at(1, "a@b.co", long_ago).unwrap();
        assert!(matches!(keys.verify(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn wrong_issuer_or_audience_is_invalid() {
        let good = make_keys("same-secret", "good-iss", "good-aud");
        let bad = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good.issue(1, "a@b.co").unwrap();
        assert!(matches!(bad.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_is_invalid() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert!(matches!(keys.verify("not.a.jwt"), Err(AppError::InvalidToken)));
        assert!(matches!(keys.verify(""), Err(AppError::InvalidToken)));
    }
}

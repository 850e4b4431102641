use std::{fmt, time::Duration};

use anyhow::Context;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

// Keeps the signing secret out of logs and panic messages.
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub db_max_connections: u32,
    pub query_timeout: Duration,
}

/// Seven days.
pub const DEFAULT_TTL_MINUTES: i64 = 7 * 24 * 60;
/// One leap year.
pub const MAX_TTL_MINUTES: i64 = 366 * 24 * 60;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "baby-diary".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "baby-diary-users".into()),
            ttl_minutes: ttl_from_env()?,
        };

        Ok(Self {
            database_url,
            jwt,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10),
            query_timeout: Duration::from_secs(parse_or("DB_QUERY_TIMEOUT_SECS", 10)),
        })
    }
}

fn ttl_from_env() -> anyhow::Result<i64> {
    match std::env::var("JWT_TTL_MINUTES") {
        Ok(raw) => {
            let minutes = raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("JWT_TTL_MINUTES is not an integer: {raw:?}"))?;
            check_ttl(minutes)
        }
        Err(_) => Ok(DEFAULT_TTL_MINUTES),
    }
}

fn check_ttl(minutes: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secret() {
        let jwt = JwtConfig {
            secret: "hunter2-signing-key".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: DEFAULT_TTL_MINUTES,
        };
        let printed = format!("{:?}", jwt);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn ttl_bounds() {
        assert_eq!(check_ttl(DEFAULT_TTL_MINUTES).unwrap(), DEFAULT_TTL_MINUTES);
        assert_eq!(check_ttl(MAX_TTL_MINUTES).unwrap(), MAX_TTL_MINUTES);
        for bad in [0, -1, -10_080, MAX_TTL_MINUTES + 1, 1_000_000_000_000, i64::MAX] {
            let err = check_ttl(bad).unwrap_err();
            assert!(err.to_string().contains("JWT_TTL_MINUTES"), "{bad}");
        }
    }

    #[test]
    fn parse_or_falls_back_when_unset() {
        assert_eq!(parse_or::<u32>("BABY_DIARY_SURELY_UNSET_VAR", 42), 42);
    }
}

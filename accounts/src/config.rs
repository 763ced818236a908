use anyhow::{Context, Result};
use std::env;

/// Process-wide settings, read once at startup.
///
/// Nothing in here changes after `main` builds it. Handlers never touch the
/// environment directly; they get what they need through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub database_url: String,
    pub surreal_user: Option<String>,
    pub surreal_pass: Option<String>,
    pub surreal_ns: String,
    pub surreal_db: String,
    pub token_ttl_hours: i64,
    pub token_leeway_secs: u64,
    pub port: u16,
}

impl Config {
    /// Builds the config from environment variables.
    ///
    /// `JWT_SECRET` is the only required one. An empty secret is refused too,
    /// since HS256 with an empty key signs tokens anyone can forge.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            jwt_secret,
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "memory://".to_string()),
            surreal_user: env::var("SURREAL_USER").ok(),
            surreal_pass: env::var("SURREAL_PASS").ok(),
            surreal_ns: env::var("SURREAL_NS").unwrap_or_else(|_| "accounts".to_string()),
            surreal_db: env::var("SURREAL_DB").unwrap_or_else(|_| "accounts".to_string()),
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", 168)?,
            token_leeway_secs: parse_var("TOKEN_LEEWAY_SECS", 60)?,
            port: parse_var("PORT", 3000)?,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_to_default_when_unset() {
        let value: u16 = parse_var("ACCOUNTS_TEST_UNSET_PORT", 3000).unwrap();
        assert_eq!(value, 3000);
    }
}

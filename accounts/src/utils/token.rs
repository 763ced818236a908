use crate::config::Config;
use crate::models::user::Claims;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and checks HS256 session tokens.
///
/// Keys are derived once from the configured secret and shared between
/// clones, so handing this to every request is just a refcount bump.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<Keys>,
    ttl_secs: i64,
    leeway_secs: u64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_hours: i64, leeway_secs: u64) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            ttl_secs: ttl_hours.saturating_mul(3600),
            leeway_secs,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            config.token_ttl_hours,
            config.token_leeway_secs,
        )
    }

    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            user_id: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)?)
    }

    /// Returns the user id bound into `token`.
    ///
    /// Any failure (bad signature, garbage input, expired beyond the leeway)
    /// collapses into `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;

        let data = decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            TokenError::InvalidToken
        })?;
        Ok(data.claims.user_id)
    }
}

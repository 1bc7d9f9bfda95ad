use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Session claims as issued by the hosted auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: Option<String>, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(security.token_expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email,
            role: Some("authenticated".to_string()),
            aud: security.jwt_audience.clone(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session secret not configured")]
    SecretMissing,

    #[error("Invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

fn secret(security: &SecurityConfig) -> Result<&[u8], SessionError> {
    if security.jwt_secret.is_empty() {
        return Err(SessionError::SecretMissing);
    }
    Ok(security.jwt_secret.as_bytes())
}

/// Verify signature, expiry and audience of a session token.
pub fn decode_session(token: &str, security: &SecurityConfig) -> Result<Claims, SessionError> {
    let key = DecodingKey::from_secret(secret(security)?);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[security.jwt_audience.as_str()]);

    let data = decode::<Claims>(token, &key, &validation)?;
    Ok(data.claims)
}

pub fn issue_session_token(claims: &Claims, security: &SecurityConfig) -> Result<String, SessionError> {
    let key = EncodingKey::from_secret(secret(security)?);
    Ok(encode(&Header::new(Algorithm::HS256), claims, &key)?)
}

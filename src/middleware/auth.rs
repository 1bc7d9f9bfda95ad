use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::auth::{decode_session, Claims, SessionError};
use crate::config::SecurityConfig;

use super::gate::Denial;

/// Identity carried by a verified session token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Resolve the caller's identity from the request headers. A missing or bad
/// token is the caller's problem (401); a missing secret is the server's.
pub fn resolve_session(headers: &HeaderMap, security: &SecurityConfig) -> Result<AuthUser, Denial> {
    let token = extract_session_token(headers, &security.session_cookie).map_err(Denial::Unauthenticated)?;
    match decode_session(&token, security) {
        Ok(claims) => Ok(AuthUser::from(claims)),
        Err(SessionError::SecretMissing) => {
            tracing::error!("SUPABASE_JWT_SECRET is not set; sessions cannot be verified");
            Err(Denial::SessionSecretMissing)
        }
        Err(e) => {
            tracing::debug!("Session rejected: {}", e);
            Err(Denial::Unauthenticated("Invalid or expired session".to_string()))
        }
    }
}

/// Bearer token from `Authorization`, falling back to the session cookie.
fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Result<String, String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| "Invalid Authorization header format".to_string())?;

        return match auth_str.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            Some(_) => Err("Empty session token".to_string()),
            None => Err("Authorization header must use Bearer token format".to_string()),
        };
    }

    session_cookie(headers, cookie_name).ok_or_else(|| "Unauthorized".to_string())
}

fn session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(cookie_name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
}

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::resolve_session;
use super::validate_tenant::{resolve_tenant, AuthContext, TenantStore};

#[derive(Debug)]
pub enum Denial {
    /// No usable session. Always checked first.
    Unauthenticated(String),
    /// A token was presented but the server has no secret to verify it with.
    SessionSecretMissing,
    /// The server runs without a database client.
    NoDatabase,
    /// Session is valid but the user maps to no tenant.
    UserInfoNotFound,
    /// The tenant lookup itself failed.
    Lookup(ApiError),
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated(reason) => ApiError::unauthorized(reason),
            Denial::SessionSecretMissing => ApiError::internal_server_error("Session verification is not configured"),
            Denial::NoDatabase => ApiError::internal_server_error("No database client"),
            Denial::UserInfoNotFound => ApiError::not_found("User info not found"),
            Denial::Lookup(err) => err,
        }
    }
}

#[derive(Debug)]
pub enum Authorization {
    Authorized(AuthContext),
    Denied(Denial),
}

/// Session, then database client, then tenant lookup.
pub async fn authorize(state: &AppState, headers: &HeaderMap) -> Authorization {
    let auth_user = match resolve_session(headers, &state.config.security) {
        Ok(user) => user,
        Err(denial) => return Authorization::Denied(denial),
    };

    let Some(store) = state.store.as_ref() else {
        return Authorization::Denied(Denial::NoDatabase);
    };

    match resolve_tenant(store, auth_user.user_id).await {
        Ok(Some(ctx)) => {
            tracing::debug!(user_id = %ctx.user.user_id, tenant_id = %ctx.tenant_id, "Tenant resolved");
            Authorization::Authorized(ctx)
        }
        Ok(None) => Authorization::Denied(Denial::UserInfoNotFound),
        Err(e) => Authorization::Denied(Denial::Lookup(e.into())),
    }
}

/// Route layer for every protected endpoint. Injects `AuthContext` and
/// `TenantStore` into the request.
pub async fn require_tenant(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authorize(&state, &headers).await {
        Authorization::Authorized(ctx) => {
            // authorize only succeeds with a store present
            if let Some(store) = state.store.clone() {
                request.extensions_mut().insert(TenantStore(store));
            }
            request.extensions_mut().insert(ctx);
            Ok(next.run(request).await)
        }
        Authorization::Denied(denial) => {
            tracing::warn!(path = %request.uri().path(), "Request denied: {:?}", denial);
            Err(denial.into())
        }
    }
}

// handlers/protected/auth/whoami.rs - GET /api/auth/whoami

use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthContext};

/// The caller as the gate resolved them: user info plus tenant.
pub async fn whoami(Extension(ctx): Extension<AuthContext>) -> ApiResult<AuthContext> {
    Ok(ApiResponse::success(ctx))
}

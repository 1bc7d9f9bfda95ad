use axum::Extension;
use uuid::Uuid;

use crate::database::models::{TreasuryAccount, TreasuryAccountInput};
use crate::error::ApiError;
use crate::middleware::{found, ApiPath, ApiResponse, ApiResult, AuthContext, TenantStore, ValidatedJson};

pub async fn list(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
) -> ApiResult<Vec<TreasuryAccount>> {
    Ok(ApiResponse::success(store.treasury.list(ctx.tenant_id).await?))
}

pub async fn get(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<TreasuryAccount> {
    let account = found(store.treasury.get(ctx.tenant_id, id).await?, "Treasury account")?;
    Ok(ApiResponse::success(account))
}

pub async fn create(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ValidatedJson(input): ValidatedJson<TreasuryAccountInput>,
) -> ApiResult<TreasuryAccount> {
    Ok(ApiResponse::created(store.treasury.create(ctx.tenant_id, &input).await?))
}

pub async fn update(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<TreasuryAccountInput>,
) -> ApiResult<TreasuryAccount> {
    let account = found(store.treasury.update(ctx.tenant_id, id, &input).await?, "Treasury account")?;
    Ok(ApiResponse::success(account))
}

pub async fn delete(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    if !store.treasury.delete(ctx.tenant_id, id).await? {
        return Err(ApiError::not_found("Treasury account not found"));
    }
    Ok(ApiResponse::no_content())
}

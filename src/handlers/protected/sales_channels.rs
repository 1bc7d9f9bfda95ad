use axum::Extension;
use uuid::Uuid;

use crate::database::models::{SalesChannel, SalesChannelInput};
use crate::error::ApiError;
use crate::middleware::{found, ApiPath, ApiResponse, ApiResult, AuthContext, TenantStore, ValidatedJson};

pub async fn list(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
) -> ApiResult<Vec<SalesChannel>> {
    Ok(ApiResponse::success(store.sales_channels.list(ctx.tenant_id).await?))
}

pub async fn create(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ValidatedJson(input): ValidatedJson<SalesChannelInput>,
) -> ApiResult<SalesChannel> {
    Ok(ApiResponse::created(store.sales_channels.create(ctx.tenant_id, &input).await?))
}

pub async fn update(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<SalesChannelInput>,
) -> ApiResult<SalesChannel> {
    let channel = found(store.sales_channels.update(ctx.tenant_id, id, &input).await?, "Sales channel")?;
    Ok(ApiResponse::success(channel))
}

pub async fn delete(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    if !store.sales_channels.delete(ctx.tenant_id, id).await? {
        return Err(ApiError::not_found("Sales channel not found"));
    }
    Ok(ApiResponse::no_content())
}

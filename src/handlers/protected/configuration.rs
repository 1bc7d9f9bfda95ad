use axum::Extension;

use crate::database::models::{ConfigurationType, ConfigurationValue, ConfigurationValueInput};
use crate::middleware::{found, ApiPath, ApiResponse, ApiResult, AuthContext, TenantStore, ValidatedJson};

pub async fn types(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
) -> ApiResult<Vec<ConfigurationType>> {
    Ok(ApiResponse::success(store.configuration.types(ctx.tenant_id).await?))
}

/// GET /api/configuration/types/:code/values
pub async fn values(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(code): ApiPath<String>,
) -> ApiResult<Vec<ConfigurationValue>> {
    let values = found(store.configuration.values(ctx.tenant_id, &code).await?, "Configuration type")?;
    Ok(ApiResponse::success(values))
}

pub async fn add_value(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(code): ApiPath<String>,
    ValidatedJson(input): ValidatedJson<ConfigurationValueInput>,
) -> ApiResult<ConfigurationValue> {
    let value = found(
        store.configuration.add_value(ctx.tenant_id, &code, &input).await?,
        "Configuration type",
    )?;
    Ok(ApiResponse::created(value))
}

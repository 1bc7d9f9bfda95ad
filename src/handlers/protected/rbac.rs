use axum::Extension;
use uuid::Uuid;

use crate::database::models::{Permission, Role, RoleInput, RolePermissionsInput, UserRolesInput};
use crate::middleware::{found, ApiPath, ApiResponse, ApiResult, AuthContext, TenantStore, ValidatedJson};

pub async fn roles(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
) -> ApiResult<Vec<Role>> {
    Ok(ApiResponse::success(store.rbac.roles(ctx.tenant_id).await?))
}

pub async fn create_role(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ValidatedJson(input): ValidatedJson<RoleInput>,
) -> ApiResult<Role> {
    let role = store.rbac.create_role(ctx.tenant_id, &input).await?;
    tracing::info!(tenant_id = %ctx.tenant_id, role_id = %role.id, "Role created");
    Ok(ApiResponse::created(role))
}

pub async fn permissions(Extension(TenantStore(store)): Extension<TenantStore>) -> ApiResult<Vec<Permission>> {
    Ok(ApiResponse::success(store.rbac.permissions().await?))
}

pub async fn role_permissions(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(role_id): ApiPath<Uuid>,
) -> ApiResult<Vec<Permission>> {
    let permissions = found(store.rbac.role_permissions(ctx.tenant_id, role_id).await?, "Role")?;
    Ok(ApiResponse::success(permissions))
}

/// POST /api/rbac/roles/:id/permissions replaces the whole set.
pub async fn set_role_permissions(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(role_id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<RolePermissionsInput>,
) -> ApiResult<Vec<Permission>> {
    let permissions = found(
        store
            .rbac
            .set_role_permissions(ctx.tenant_id, role_id, &input.permission_ids)
            .await?,
        "Role",
    )?;
    tracing::info!(tenant_id = %ctx.tenant_id, role_id = %role_id, count = permissions.len(), "Role permissions replaced");
    Ok(ApiResponse::success(permissions))
}

pub async fn user_roles(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> ApiResult<Vec<Role>> {
    let roles = found(store.rbac.user_roles(ctx.tenant_id, user_id).await?, "User")?;
    Ok(ApiResponse::success(roles))
}

/// POST /api/rbac/users/:id/roles replaces the whole set.
pub async fn set_user_roles(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(user_id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<UserRolesInput>,
) -> ApiResult<Vec<Role>> {
    let roles = found(
        store.rbac.set_user_roles(ctx.tenant_id, user_id, &input.role_ids).await?,
        "User",
    )?;
    tracing::info!(tenant_id = %ctx.tenant_id, user_id = %user_id, count = roles.len(), "User roles replaced");
    Ok(ApiResponse::success(roles))
}

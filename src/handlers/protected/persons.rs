use axum::Extension;
use uuid::Uuid;

use crate::database::models::{Person, PersonFilter, PersonInput};
use crate::error::ApiError;
use crate::middleware::{found, ApiPath, ApiQuery, ApiResponse, ApiResult, AuthContext, TenantStore, ValidatedJson};

/// GET /api/persons?search=
pub async fn list(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiQuery(filter): ApiQuery<PersonFilter>,
) -> ApiResult<Vec<Person>> {
    Ok(ApiResponse::success(store.persons.list(ctx.tenant_id, &filter).await?))
}

pub async fn get(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Person> {
    Ok(ApiResponse::success(found(store.persons.get(ctx.tenant_id, id).await?, "Person")?))
}

pub async fn create(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ValidatedJson(input): ValidatedJson<PersonInput>,
) -> ApiResult<Person> {
    Ok(ApiResponse::created(store.persons.create(ctx.tenant_id, &input).await?))
}

pub async fn update(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<PersonInput>,
) -> ApiResult<Person> {
    let person = found(store.persons.update(ctx.tenant_id, id, &input).await?, "Person")?;
    Ok(ApiResponse::success(person))
}

pub async fn delete(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    if !store.persons.delete(ctx.tenant_id, id).await? {
        return Err(ApiError::not_found("Person not found"));
    }
    Ok(ApiResponse::no_content())
}

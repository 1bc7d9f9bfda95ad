use axum::Extension;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{
    ClosedPeriod, ClosedPeriodInput, PricingPlan, PricingPlanInput, Property, PropertyHighlight, PropertyImage,
    PropertyImageInput, PropertyInput, PropertyReview, SlugQuery,
};
use crate::error::ApiError;
use crate::middleware::{found, ApiPath, ApiQuery, ApiResponse, ApiResult, AuthContext, TenantStore, ValidatedJson};
use crate::services::Store;

async fn require_property(store: &Store, tenant_id: Uuid, id: Uuid) -> Result<Property, ApiError> {
    found(store.properties.get(tenant_id, id).await?, "Property")
}

async fn ensure_slug_free(store: &Store, slug: &str, exclude_id: Option<Uuid>) -> Result<(), ApiError> {
    if !store.properties.validate_slug_uniqueness(slug, exclude_id).await? {
        return Err(ApiError::conflict(format!("Slug '{}' is already in use", slug)));
    }
    Ok(())
}

pub async fn list(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
) -> ApiResult<Vec<Property>> {
    Ok(ApiResponse::success(store.properties.list(ctx.tenant_id).await?))
}

pub async fn get(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Property> {
    Ok(ApiResponse::success(require_property(&store, ctx.tenant_id, id).await?))
}

pub async fn create(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ValidatedJson(input): ValidatedJson<PropertyInput>,
) -> ApiResult<Property> {
    ensure_slug_free(&store, &input.slug, None).await?;
    let property = store.properties.create(ctx.tenant_id, &input).await?;
    tracing::info!(tenant_id = %ctx.tenant_id, property_id = %property.id, "Property created");
    Ok(ApiResponse::created(property))
}

pub async fn update(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<PropertyInput>,
) -> ApiResult<Property> {
    require_property(&store, ctx.tenant_id, id).await?;
    ensure_slug_free(&store, &input.slug, Some(id)).await?;
    let property = found(store.properties.update(ctx.tenant_id, id, &input).await?, "Property")?;
    Ok(ApiResponse::success(property))
}

pub async fn delete(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    if !store.properties.delete(ctx.tenant_id, id).await? {
        return Err(ApiError::not_found("Property not found"));
    }
    tracing::info!(tenant_id = %ctx.tenant_id, property_id = %id, "Property deleted");
    Ok(ApiResponse::no_content())
}

#[derive(Debug, Serialize)]
pub struct SlugAvailability {
    pub slug: String,
    pub available: bool,
}

/// GET /api/properties/validate-slug?slug&excludeId
pub async fn validate_slug(
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiQuery(query): ApiQuery<SlugQuery>,
) -> ApiResult<SlugAvailability> {
    let slug = query.slug.trim();
    if slug.is_empty() {
        return Err(ApiError::bad_request("slug is required"));
    }
    let available = store.properties.validate_slug_uniqueness(slug, query.exclude_id).await?;
    Ok(ApiResponse::success(SlugAvailability {
        slug: slug.to_string(),
        available,
    }))
}

pub async fn pricing_plans(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<PricingPlan>> {
    require_property(&store, ctx.tenant_id, id).await?;
    Ok(ApiResponse::success(store.properties.pricing_plans(ctx.tenant_id, id).await?))
}

pub async fn add_pricing_plan(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<PricingPlanInput>,
) -> ApiResult<PricingPlan> {
    require_property(&store, ctx.tenant_id, id).await?;
    let plan = store.properties.add_pricing_plan(ctx.tenant_id, id, &input).await?;
    Ok(ApiResponse::created(plan))
}

pub async fn images(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<PropertyImage>> {
    require_property(&store, ctx.tenant_id, id).await?;
    Ok(ApiResponse::success(store.properties.images(ctx.tenant_id, id).await?))
}

pub async fn add_image(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<PropertyImageInput>,
) -> ApiResult<PropertyImage> {
    require_property(&store, ctx.tenant_id, id).await?;
    let image = store.properties.add_image(ctx.tenant_id, id, &input).await?;
    Ok(ApiResponse::created(image))
}

pub async fn highlights(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<PropertyHighlight>> {
    require_property(&store, ctx.tenant_id, id).await?;
    Ok(ApiResponse::success(store.properties.highlights(ctx.tenant_id, id).await?))
}

pub async fn reviews(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<PropertyReview>> {
    require_property(&store, ctx.tenant_id, id).await?;
    Ok(ApiResponse::success(store.properties.reviews(ctx.tenant_id, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ClosedPeriodQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub async fn closed_periods(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ClosedPeriodQuery>,
) -> ApiResult<Vec<ClosedPeriod>> {
    require_property(&store, ctx.tenant_id, id).await?;
    let window = match (query.from, query.to) {
        (Some(from), Some(to)) if to < from => {
            return Err(ApiError::bad_request("'to' must not be before 'from'"));
        }
        (Some(from), Some(to)) => Some((from, to)),
        (None, None) => None,
        _ => return Err(ApiError::bad_request("'from' and 'to' must be given together")),
    };
    Ok(ApiResponse::success(
        store.properties.closed_periods(ctx.tenant_id, id, window).await?,
    ))
}

pub async fn add_closed_period(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<ClosedPeriodInput>,
) -> ApiResult<ClosedPeriod> {
    require_property(&store, ctx.tenant_id, id).await?;
    let period = store.properties.add_closed_period(ctx.tenant_id, id, &input).await?;
    Ok(ApiResponse::created(period))
}

pub async fn delete_closed_period(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath((id, period_id)): ApiPath<(Uuid, Uuid)>,
) -> ApiResult<()> {
    if !store.properties.delete_closed_period(ctx.tenant_id, id, period_id).await? {
        return Err(ApiError::not_found("Closed period not found"));
    }
    Ok(ApiResponse::no_content())
}

use axum::extract::State;
use uuid::Uuid;

use crate::database::models::{BookingFilter, GuideAccessRequest, GuideContent, GuideSummary};
use crate::error::ApiError;
use crate::handlers::public_store;
use crate::middleware::{found, ApiPath, ApiResponse, ApiResult, ValidatedJson};
use crate::services::guide_access::find_guest_booking;
use crate::state::AppState;

/// GET /api/public/guides/:propertyId
///
/// Only the cover of the guide; sections require a validated guest.
pub async fn summary(State(state): State<AppState>, ApiPath(property_id): ApiPath<Uuid>) -> ApiResult<GuideSummary> {
    let store = public_store(&state)?;
    let property = found(store.properties.find_public(property_id).await?, "Property")?;
    let guide = found(store.guides.find_published(property.tenant_id, property.id).await?, "Guide")?;

    Ok(ApiResponse::success(GuideSummary {
        property_id: property.id,
        property_name: property.name,
        title: guide.title,
        requires_validation: true,
    }))
}

/// POST /api/public/guides/validate-access
///
/// Name matching against the property's bookings. This identifies a guest
/// well enough to show house instructions; it is not an authentication step.
pub async fn validate_access(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GuideAccessRequest>,
) -> ApiResult<GuideContent> {
    let store = public_store(&state)?;
    let property = found(store.properties.find_public(request.property_id).await?, "Property")?;
    let guide = found(store.guides.find_published(property.tenant_id, property.id).await?, "Guide")?;

    let bookings = store
        .bookings
        .list(property.tenant_id, &BookingFilter::for_property(property.id))
        .await?;

    if find_guest_booking(&bookings, &request.first_name, &request.last_name).is_none() {
        tracing::info!(property_id = %property.id, "Guide access denied: no matching booking");
        return Err(ApiError::forbidden("No booking found for this guest"));
    }

    let sections = store.guides.sections(property.tenant_id, guide.id).await?;
    tracing::info!(property_id = %property.id, "Guide access granted");
    Ok(ApiResponse::success(GuideContent { guide, sections }))
}

use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::BookingFilter;
use crate::error::ApiError;
use crate::handlers::public_store;
use crate::middleware::{found, ApiQuery, ApiResponse, ApiResult};
use crate::services::calendar::{compute_availability, DateWindow, DayAvailability};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub property_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/public/calendar/availability?propertyId&startDate&endDate
pub async fn availability(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> ApiResult<Vec<DayAvailability>> {
    let (Some(property_id), Some(start), Some(end)) = (query.property_id, query.start_date, query.end_date) else {
        return Err(ApiError::bad_request("propertyId, startDate and endDate are required"));
    };
    let property_id = Uuid::parse_str(property_id.trim())
        .map_err(|_| ApiError::bad_request("propertyId must be a valid UUID"))?;
    let window = DateWindow::parse(&start, &end, state.config.api.max_calendar_days)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let store = public_store(&state)?;
    let property = found(store.properties.find_public(property_id).await?, "Property")?;

    let filter = BookingFilter::for_property(property.id).between(window.start, window.end);
    let bookings = store.bookings.list(property.tenant_id, &filter).await?;
    let closed = store
        .properties
        .closed_periods(property.tenant_id, property.id, Some((window.start, window.end)))
        .await?;

    tracing::debug!(property_id = %property.id, days = window.days(), "Computed availability");
    Ok(ApiResponse::success(compute_availability(window, &bookings, &closed)))
}

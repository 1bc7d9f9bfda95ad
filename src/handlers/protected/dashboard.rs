use axum::{extract::State, Extension};
use chrono::Utc;
use serde::Deserialize;

use crate::database::models::BookingFilter;
use crate::error::ApiError;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult, AuthContext, TenantStore};
use crate::services::dashboard::{build_dashboard, Dashboard, YearFilter};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub year: Option<String>,
}

/// GET /api/dashboard/stats?year=YYYY|all
pub async fn stats(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> ApiResult<Dashboard> {
    let filter: YearFilter = match query.year.as_deref() {
        Some(raw) => raw.parse().map_err(ApiError::bad_request)?,
        None => YearFilter::All,
    };

    let all = BookingFilter::default();
    let (bookings, properties) = futures::try_join!(
        store.bookings.list(ctx.tenant_id, &all),
        store.properties.list(ctx.tenant_id),
    )?;

    Ok(ApiResponse::success(build_dashboard(
        &bookings,
        &properties,
        filter,
        Utc::now().date_naive(),
        state.config.api.recent_bookings_limit,
    )))
}

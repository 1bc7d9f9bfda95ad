use axum::Extension;
use uuid::Uuid;

use crate::database::models::{Booking, BookingFilter, BookingInput, Movement, MovementInput};
use crate::error::ApiError;
use crate::middleware::{found, ApiPath, ApiQuery, ApiResponse, ApiResult, AuthContext, TenantStore, ValidatedJson};

pub async fn list(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiQuery(filter): ApiQuery<BookingFilter>,
) -> ApiResult<Vec<Booking>> {
    Ok(ApiResponse::success(store.bookings.list(ctx.tenant_id, &filter).await?))
}

pub async fn get(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Booking> {
    let booking = found(store.bookings.get(ctx.tenant_id, id).await?, "Booking")?;
    Ok(ApiResponse::success(booking))
}

pub async fn create(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ValidatedJson(input): ValidatedJson<BookingInput>,
) -> ApiResult<Booking> {
    let booking = store.bookings.create(ctx.tenant_id, &input).await?;
    tracing::info!(tenant_id = %ctx.tenant_id, booking_id = %booking.id, "Booking created");
    Ok(ApiResponse::created(booking))
}

pub async fn update(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<BookingInput>,
) -> ApiResult<Booking> {
    let booking = found(store.bookings.update(ctx.tenant_id, id, &input).await?, "Booking")?;
    Ok(ApiResponse::success(booking))
}

pub async fn delete(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<()> {
    if !store.bookings.delete(ctx.tenant_id, id).await? {
        return Err(ApiError::not_found("Booking not found"));
    }
    tracing::info!(tenant_id = %ctx.tenant_id, booking_id = %id, "Booking deleted");
    Ok(ApiResponse::no_content())
}

pub async fn movements(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<Movement>> {
    let movements = found(store.bookings.movements(ctx.tenant_id, id).await?, "Booking")?;
    Ok(ApiResponse::success(movements))
}

pub async fn add_movement(
    Extension(ctx): Extension<AuthContext>,
    Extension(TenantStore(store)): Extension<TenantStore>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<MovementInput>,
) -> ApiResult<Movement> {
    let movement = found(store.bookings.add_movement(ctx.tenant_id, id, &input).await?, "Booking")?;
    Ok(ApiResponse::created(movement))
}

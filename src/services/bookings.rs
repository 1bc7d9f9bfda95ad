use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::configuration::{BOOKING_STATUS, BOOKING_TYPE, PAYMENT_METHOD};
use crate::database::models::{Booking, BookingFilter, BookingInput, Movement, MovementInput};

use super::{ensure_config_value, ensure_in_tenant};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list(&self, tenant_id: Uuid, filter: &BookingFilter) -> Result<Vec<Booking>, DatabaseError>;

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Booking>, DatabaseError>;

    async fn create(&self, tenant_id: Uuid, input: &BookingInput) -> Result<Booking, DatabaseError>;

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: &BookingInput,
    ) -> Result<Option<Booking>, DatabaseError>;

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError>;

    /// Payments of a booking; `None` when the booking is not in the tenant.
    async fn movements(&self, tenant_id: Uuid, booking_id: Uuid) -> Result<Option<Vec<Movement>>, DatabaseError>;

    async fn add_movement(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
        input: &MovementInput,
    ) -> Result<Option<Movement>, DatabaseError>;
}

const BOOKING_SELECT: &str = r#"
    SELECT
        b.id, b.tenant_id, b.property_id, b.person_id, b.check_in, b.check_out, b.guests,
        b.status_id, b.booking_type_id, b.sales_channel_id, b.total_amount, b.notes,
        b.created_at, b.updated_at,
        s.code AS status_code,
        p.name AS property_name,
        g.first_name AS guest_first_name,
        g.last_name AS guest_last_name
    FROM bookings b
    LEFT JOIN configuration_values s ON s.id = b.status_id AND s.tenant_id = b.tenant_id
    LEFT JOIN properties p ON p.id = b.property_id AND p.tenant_id = b.tenant_id
    LEFT JOIN persons g ON g.id = b.person_id AND g.tenant_id = b.tenant_id
    WHERE b.tenant_id = $1
"#;

const MOVEMENT_COLUMNS: &str = "id, tenant_id, booking_id, treasury_account_id, amount, movement_date, \
     concept, payment_method_id, created_at";

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Referenced rows must live in the same tenant as the booking.
    async fn check_references(&self, tenant_id: Uuid, input: &BookingInput) -> Result<(), DatabaseError> {
        ensure_in_tenant(&self.pool, "properties", tenant_id, input.property_id).await?;
        if let Some(person_id) = input.person_id {
            ensure_in_tenant(&self.pool, "persons", tenant_id, person_id).await?;
        }
        if let Some(channel_id) = input.sales_channel_id {
            ensure_in_tenant(&self.pool, "sales_channels", tenant_id, channel_id).await?;
        }
        if let Some(status_id) = input.status_id {
            ensure_config_value(&self.pool, tenant_id, status_id, BOOKING_STATUS).await?;
        }
        if let Some(type_id) = input.booking_type_id {
            ensure_config_value(&self.pool, tenant_id, type_id, BOOKING_TYPE).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn list(&self, tenant_id: Uuid, filter: &BookingFilter) -> Result<Vec<Booking>, DatabaseError> {
        let sql = format!(
            "{} AND ($2::uuid IS NULL OR b.property_id = $2) \
               AND ($3::uuid IS NULL OR b.person_id = $3) \
               AND ($4::date IS NULL OR b.check_out > $4) \
               AND ($5::date IS NULL OR b.check_in <= $5) \
             ORDER BY b.check_in DESC, b.created_at DESC",
            BOOKING_SELECT
        );

        let rows = sqlx::query_as::<_, Booking>(&sql)
            .bind(tenant_id)
            .bind(filter.property_id)
            .bind(filter.person_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Booking>, DatabaseError> {
        let sql = format!("{} AND b.id = $2", BOOKING_SELECT);
        let row = sqlx::query_as::<_, Booking>(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, tenant_id: Uuid, input: &BookingInput) -> Result<Booking, DatabaseError> {
        self.check_references(tenant_id, input).await?;

        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO bookings (
                tenant_id, property_id, person_id, check_in, check_out, guests,
                status_id, booking_type_id, sales_channel_id, total_amount, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(tenant_id)
        .bind(input.property_id)
        .bind(input.person_id)
        .bind(input.check_in)
        .bind(input.check_out)
        .bind(input.guests)
        .bind(input.status_id)
        .bind(input.booking_type_id)
        .bind(input.sales_channel_id)
        .bind(input.total_amount)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "Booking"))?;

        self.get(tenant_id, id)
            .await?
            .ok_or_else(|| DatabaseError::QueryError(format!("booking {} vanished after insert", id)))
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: &BookingInput,
    ) -> Result<Option<Booking>, DatabaseError> {
        self.check_references(tenant_id, input).await?;

        let updated = sqlx::query(
            r#"
            UPDATE bookings SET
                property_id = $3, person_id = $4, check_in = $5, check_out = $6, guests = $7,
                status_id = $8, booking_type_id = $9, sales_channel_id = $10,
                total_amount = $11, notes = $12, updated_at = now()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(input.property_id)
        .bind(input.person_id)
        .bind(input.check_in)
        .bind(input.check_out)
        .bind(input.guests)
        .bind(input.status_id)
        .bind(input.booking_type_id)
        .bind(input.sales_channel_id)
        .bind(input.total_amount)
        .bind(&input.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "Booking"))?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(tenant_id, id).await
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM bookings WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn movements(&self, tenant_id: Uuid, booking_id: Uuid) -> Result<Option<Vec<Movement>>, DatabaseError> {
        if self.get(tenant_id, booking_id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM movements WHERE tenant_id = $1 AND booking_id = $2 \
             ORDER BY movement_date, created_at",
            MOVEMENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Movement>(&sql)
            .bind(tenant_id)
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(Some(rows))
    }

    async fn add_movement(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
        input: &MovementInput,
    ) -> Result<Option<Movement>, DatabaseError> {
        if self.get(tenant_id, booking_id).await?.is_none() {
            return Ok(None);
        }
        if let Some(account_id) = input.treasury_account_id {
            ensure_in_tenant(&self.pool, "treasury_accounts", tenant_id, account_id).await?;
        }
        if let Some(method_id) = input.payment_method_id {
            ensure_config_value(&self.pool, tenant_id, method_id, PAYMENT_METHOD).await?;
        }

        let sql = format!(
            "INSERT INTO movements (tenant_id, booking_id, treasury_account_id, amount, movement_date, \
                                    concept, payment_method_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            MOVEMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, Movement>(&sql)
            .bind(tenant_id)
            .bind(booking_id)
            .bind(input.treasury_account_id)
            .bind(input.amount)
            .bind(input.movement_date)
            .bind(&input.concept)
            .bind(input.payment_method_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Movement"))?;
        Ok(Some(row))
    }
}

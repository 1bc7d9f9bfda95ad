use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation;

/// Status codes that take a booking out of availability and statistics.
/// Statuses are tenant-configured values, so the match is by code.
pub const CANCELLED_STATUS_CODES: &[&str] = &["cancelled", "canceled", "cancelada"];

pub fn is_cancelled_code(code: &str) -> bool {
    let code = code.trim();
    CANCELLED_STATUS_CODES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(code))
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub person_id: Option<Uuid>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub status_id: Option<Uuid>,
    pub booking_type_id: Option<Uuid>,
    pub sales_channel_id: Option<Uuid>,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Joined columns
    pub status_code: Option<String>,
    pub property_name: Option<String>,
    pub guest_first_name: Option<String>,
    pub guest_last_name: Option<String>,
}

impl Booking {
    pub fn is_cancelled(&self) -> bool {
        self.status_code.as_deref().map(is_cancelled_code).unwrap_or(false)
    }

    /// Nights occupied, check-out day excluded.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days().max(0)
    }

    /// True when the night of `day` belongs to this stay.
    pub fn occupies(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }

    pub fn guest_name(&self) -> Option<String> {
        match (&self.guest_first_name, &self.guest_last_name) {
            (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
            (Some(f), None) => Some(f.clone()),
            (None, Some(l)) => Some(l.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_stay"))]
pub struct BookingInput {
    pub property_id: Uuid,
    pub person_id: Option<Uuid>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, max = 100, message = "Guests must be between 1 and 100"))]
    pub guests: i32,
    pub status_id: Option<Uuid>,
    pub booking_type_id: Option<Uuid>,
    pub sales_channel_id: Option<Uuid>,
    #[serde(default)]
    #[validate(custom(function = "validation::non_negative"))]
    pub total_amount: Decimal,
    #[validate(length(max = 2000, message = "Notes too long"))]
    pub notes: Option<String>,
}

fn validate_stay(input: &BookingInput) -> Result<(), ValidationError> {
    if input.check_out <= input.check_in {
        let mut err = ValidationError::new("stay");
        err.message = Some("Check-out must be after check-in".into());
        return Err(err);
    }
    Ok(())
}

/// Query-string filters for listing bookings. `from`/`to` select stays that
/// overlap the window.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    pub property_id: Option<Uuid>,
    pub person_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl BookingFilter {
    pub fn for_property(property_id: Uuid) -> Self {
        Self {
            property_id: Some(property_id),
            ..Default::default()
        }
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        if self.property_id.is_some_and(|id| id != booking.property_id) {
            return false;
        }
        if self.person_id.is_some() && self.person_id != booking.person_id {
            return false;
        }
        if self.from.is_some_and(|from| booking.check_out <= from) {
            return false;
        }
        if self.to.is_some_and(|to| booking.check_in > to) {
            return false;
        }
        true
    }
}

/// Payment recorded against a booking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub booking_id: Uuid,
    pub treasury_account_id: Option<Uuid>,
    pub amount: Decimal,
    pub movement_date: NaiveDate,
    pub concept: Option<String>,
    pub payment_method_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MovementInput {
    pub treasury_account_id: Option<Uuid>,
    #[validate(custom(function = "validation::positive"))]
    pub amount: Decimal,
    pub movement_date: NaiveDate,
    #[validate(length(max = 500, message = "Concept too long"))]
    pub concept: Option<String>,
    pub payment_method_id: Option<Uuid>,
}

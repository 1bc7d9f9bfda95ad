use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const BOOKING_STATUS: &str = "booking_status";
pub const BOOKING_TYPE: &str = "booking_type";
pub const PAYMENT_METHOD: &str = "payment_method";

/// A tenant-defined lookup table: booking statuses, booking types, tax types,
/// payment methods.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationType {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationValue {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub type_id: Uuid,
    pub code: String,
    pub label: String,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationValueInput {
    #[validate(length(min = 1, max = 60, message = "Code must be between 1 and 60 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 120, message = "Label must be between 1 and 120 characters"))]
    pub label: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

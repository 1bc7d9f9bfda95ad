use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub google_place_id: Option<String>,
    pub max_guests: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub base_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(custom(function = "validation::slug"))]
    pub slug: String,
    #[validate(length(max = 5000, message = "Description too long"))]
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[validate(custom(function = "validation::latitude"))]
    pub latitude: Option<f64>,
    #[validate(custom(function = "validation::longitude"))]
    pub longitude: Option<f64>,
    pub google_place_id: Option<String>,
    #[validate(range(min = 1, max = 100, message = "Max guests must be between 1 and 100"))]
    pub max_guests: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub bedrooms: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub bathrooms: i32,
    #[serde(default)]
    #[validate(custom(function = "validation::non_negative"))]
    pub base_price: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Minimal, tenant-revealing projection used by the public endpoints to find
/// which tenant a property belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicProperty {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PropertyImage {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PropertyImageInput {
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub url: String,
    #[validate(length(max = 300))]
    pub caption: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PropertyHighlight {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PropertyReview {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub author_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub nightly_price: Decimal,
    pub min_nights: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_plan_dates"))]
pub struct PricingPlanInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(custom(function = "validation::non_negative"))]
    pub nightly_price: Decimal,
    #[serde(default = "default_min_nights")]
    #[validate(range(min = 1, max = 365))]
    pub min_nights: i32,
}

fn default_min_nights() -> i32 {
    1
}

fn validate_plan_dates(input: &PricingPlanInput) -> Result<(), ValidationError> {
    validation::date_range(input.start_date, input.end_date)
}

/// Inclusive range of days during which a property cannot be booked.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClosedPeriod {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl ClosedPeriod {
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_closed_dates"))]
pub struct ClosedPeriodInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(max = 300))]
    pub reason: Option<String>,
}

fn validate_closed_dates(input: &ClosedPeriodInput) -> Result<(), ValidationError> {
    validation::date_range(input.start_date, input.end_date)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugQuery {
    pub slug: String,
    pub exclude_id: Option<Uuid>,
}

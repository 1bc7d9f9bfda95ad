//! Field rules shared by the request payloads, plugged into `validator` via
//! `#[validate(custom(function = ...))]`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::borrow::{Borrow, Cow};
use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(error("non_negative", "Must be zero or greater"));
    }
    Ok(())
}

pub fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if value <= &Decimal::ZERO {
        return Err(error("positive", "Must be greater than zero"));
    }
    Ok(())
}

pub fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if value < &Decimal::ZERO || value > &Decimal::ONE_HUNDRED {
        return Err(error("percentage", "Must be between 0 and 100"));
    }
    Ok(())
}

pub fn latitude<T: Borrow<f64>>(value: T) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(value.borrow()) {
        return Err(error("latitude", "Latitude out of range"));
    }
    Ok(())
}

pub fn longitude<T: Borrow<f64>>(value: T) -> Result<(), ValidationError> {
    if !(-180.0..=180.0).contains(value.borrow()) {
        return Err(error("longitude", "Longitude out of range"));
    }
    Ok(())
}

/// Slugs appear in public URLs: lowercase ascii, digits and single hyphens.
pub fn slug(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.len() > 120 {
        return Err(error("slug", "Slug must be between 1 and 120 characters"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(error(
            "slug",
            "Slug can only contain lowercase letters, numbers, and hyphens",
        ));
    }
    if value.starts_with('-') || value.ends_with('-') || value.contains("--") {
        return Err(error("slug", "Slug cannot start, end, or repeat hyphens"));
    }
    Ok(())
}

/// Names compared against booking records must carry at least one visible character.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("not_blank", "Cannot be empty"));
    }
    Ok(())
}

pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        return Err(error("date_range", "End date must not be before start date"));
    }
    Ok(())
}

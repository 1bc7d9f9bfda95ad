//! Tenant dashboard aggregation. Pure over already-loaded rows so the handler
//! can fetch bookings and properties concurrently.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::database::models::{Booking, Property};

/// `year=YYYY` narrows to stays checking in that year; `all` or nothing is tenant-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl FromStr for YearFilter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        match raw.parse::<i32>() {
            Ok(year) if (1900..=9999).contains(&year) => Ok(YearFilter::Year(year)),
            _ => Err(format!("Invalid year '{}', expected YYYY or 'all'", raw)),
        }
    }
}

impl YearFilter {
    pub fn includes(&self, booking: &Booking) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(year) => booking.check_in.year() == *year,
        }
    }

    /// Half-open night range the occupancy is measured against.
    fn period(&self, bookings: &[&Booking]) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            YearFilter::Year(year) => {
                let start = NaiveDate::from_ymd_opt(*year, 1, 1)?;
                let end = NaiveDate::from_ymd_opt(*year + 1, 1, 1)?;
                Some((start, end))
            }
            YearFilter::All => {
                let start = bookings.iter().map(|b| b.check_in).min()?;
                let end = bookings.iter().map(|b| b.check_out).max()?;
                Some((start, end))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_bookings: usize,
    pub active_bookings: usize,
    pub cancelled_bookings: usize,
    pub upcoming_check_ins: usize,
    pub total_revenue: Decimal,
    pub total_nights: i64,
    pub total_properties: usize,
    pub active_properties: usize,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentBooking {
    pub id: Uuid,
    pub property_id: Uuid,
    pub property_name: Option<String>,
    pub guest_name: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: Option<String>,
    pub total_amount: Decimal,
}

impl From<&Booking> for RecentBooking {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id,
            property_id: b.property_id,
            property_name: b.property_name.clone(),
            guest_name: b.guest_name(),
            check_in: b.check_in,
            check_out: b.check_out,
            status: b.status_code.clone(),
            total_amount: b.total_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOccupancy {
    pub property_id: Uuid,
    pub property_name: String,
    pub bookings: usize,
    pub booked_nights: i64,
    pub available_nights: i64,
    pub occupancy_rate: f64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_bookings: Vec<RecentBooking>,
    pub property_occupancy: Vec<PropertyOccupancy>,
}

fn rate(booked: i64, available: i64) -> f64 {
    if available <= 0 {
        return 0.0;
    }
    let pct = booked as f64 * 100.0 / available as f64;
    (pct * 10.0).round() / 10.0
}

fn nights_within(booking: &Booking, period: Option<(NaiveDate, NaiveDate)>) -> i64 {
    match period {
        Some((start, end)) => {
            let from = booking.check_in.max(start);
            let to = booking.check_out.min(end);
            (to - from).num_days().max(0)
        }
        None => 0,
    }
}

pub fn build_dashboard(
    bookings: &[Booking],
    properties: &[Property],
    filter: YearFilter,
    today: NaiveDate,
    recent_limit: usize,
) -> Dashboard {
    let in_scope: Vec<&Booking> = bookings.iter().filter(|b| filter.includes(b)).collect();
    let active: Vec<&Booking> = in_scope.iter().copied().filter(|b| !b.is_cancelled()).collect();

    let period = filter.period(&active);
    let period_nights = period.map(|(s, e)| (e - s).num_days().max(0)).unwrap_or(0);

    let property_occupancy: Vec<PropertyOccupancy> = properties
        .iter()
        .map(|property| {
            let stays: Vec<&&Booking> = active.iter().filter(|b| b.property_id == property.id).collect();
            let booked_nights: i64 = stays.iter().map(|b| nights_within(b, period)).sum();
            PropertyOccupancy {
                property_id: property.id,
                property_name: property.name.clone(),
                bookings: stays.len(),
                booked_nights,
                available_nights: period_nights,
                occupancy_rate: rate(booked_nights, period_nights),
                revenue: stays.iter().map(|b| b.total_amount).sum(),
            }
        })
        .collect();

    // Capacity only counts active properties, so booked nights must too.
    let total_booked: i64 = properties
        .iter()
        .zip(&property_occupancy)
        .filter(|(property, _)| property.is_active)
        .map(|(_, occupancy)| occupancy.booked_nights)
        .sum();
    let capacity = period_nights * properties.iter().filter(|p| p.is_active).count() as i64;

    let stats = DashboardStats {
        total_bookings: in_scope.len(),
        active_bookings: active.len(),
        cancelled_bookings: in_scope.len() - active.len(),
        upcoming_check_ins: active.iter().filter(|b| b.check_in >= today).count(),
        total_revenue: active.iter().map(|b| b.total_amount).sum(),
        total_nights: active.iter().map(|b| b.nights()).sum(),
        total_properties: properties.len(),
        active_properties: properties.iter().filter(|p| p.is_active).count(),
        occupancy_rate: rate(total_booked, capacity),
    };

    let mut recent: Vec<&Booking> = in_scope;
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_bookings = recent
        .into_iter()
        .take(recent_limit)
        .map(RecentBooking::from)
        .collect();

    Dashboard {
        stats,
        recent_bookings,
        property_occupancy,
    }
}

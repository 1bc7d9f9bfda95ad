use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::database::models::{
    Booking, ClosedPeriod, ConfigurationType, ConfigurationValue, Guide, GuideSection, Person, Property,
};

pub fn property(tenant_id: Uuid, name: &str, slug: &str) -> Property {
    let now = Utc::now();
    Property {
        id: Uuid::new_v4(),
        tenant_id,
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        address: None,
        city: Some("Valencia".to_string()),
        country: Some("ES".to_string()),
        latitude: None,
        longitude: None,
        google_place_id: None,
        max_guests: 4,
        bedrooms: 2,
        bathrooms: 1,
        base_price: Decimal::from(90),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// A stay with its joined status already filled in, for pure-function tests.
pub fn booking(property_id: Uuid, check_in: NaiveDate, check_out: NaiveDate, status: Option<&str>) -> Booking {
    let now = Utc::now();
    Booking {
        id: Uuid::new_v4(),
        tenant_id: Uuid::nil(),
        property_id,
        person_id: None,
        check_in,
        check_out,
        guests: 2,
        status_id: None,
        booking_type_id: None,
        sales_channel_id: None,
        total_amount: Decimal::ZERO,
        notes: None,
        created_at: now,
        updated_at: now,
        status_code: status.map(str::to_string),
        property_name: None,
        guest_first_name: None,
        guest_last_name: None,
    }
}

pub fn closed_period(property_id: Uuid, start_date: NaiveDate, end_date: NaiveDate) -> ClosedPeriod {
    ClosedPeriod {
        id: Uuid::new_v4(),
        tenant_id: Uuid::nil(),
        property_id,
        start_date,
        end_date,
        reason: Some("maintenance".to_string()),
    }
}

pub fn person(tenant_id: Uuid, first_name: &str, last_name: &str) -> Person {
    let now = Utc::now();
    Person {
        id: Uuid::new_v4(),
        tenant_id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: None,
        phone: None,
        document_type: None,
        document_number: None,
        nationality: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn status_type(tenant_id: Uuid) -> ConfigurationType {
    ConfigurationType {
        id: Uuid::new_v4(),
        tenant_id,
        code: "booking_status".to_string(),
        name: "Booking status".to_string(),
    }
}

pub fn status_value(kind: &ConfigurationType, code: &str) -> ConfigurationValue {
    ConfigurationValue {
        id: Uuid::new_v4(),
        tenant_id: kind.tenant_id,
        type_id: kind.id,
        code: code.to_string(),
        label: code.to_string(),
        sort_order: 0,
        is_active: true,
    }
}

pub fn published_guide(tenant_id: Uuid, property_id: Uuid) -> Guide {
    Guide {
        id: Uuid::new_v4(),
        tenant_id,
        property_id,
        title: "Welcome home".to_string(),
        welcome_message: Some("Keys are in the lockbox".to_string()),
        is_published: true,
    }
}

pub fn section(guide: &Guide, title: &str, sort_order: i32) -> GuideSection {
    GuideSection {
        id: Uuid::new_v4(),
        guide_id: guide.id,
        title: title.to_string(),
        content: format!("{} details", title),
        sort_order,
    }
}

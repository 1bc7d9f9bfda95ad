//! In-memory repositories backing router tests. One lock over all tables so
//! joined reads see a consistent snapshot.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::*;
use crate::services::{
    BookingRepository, ConfigurationRepository, GuideRepository, PersonRepository, PropertyRepository,
    RbacRepository, SalesChannelRepository, Store, TreasuryRepository, UserInfoRepository,
};

#[derive(Default)]
pub struct Tables {
    pub users: Vec<UserInfo>,
    pub properties: Vec<Property>,
    pub bookings: Vec<Booking>,
    pub movements: Vec<Movement>,
    pub persons: Vec<Person>,
    pub closed_periods: Vec<ClosedPeriod>,
    pub pricing_plans: Vec<PricingPlan>,
    pub images: Vec<PropertyImage>,
    pub highlights: Vec<PropertyHighlight>,
    pub reviews: Vec<PropertyReview>,
    pub treasury: Vec<TreasuryAccount>,
    pub sales_channels: Vec<SalesChannel>,
    pub config_types: Vec<ConfigurationType>,
    pub config_values: Vec<ConfigurationValue>,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub role_permissions: HashMap<Uuid, HashSet<Uuid>>,
    /// (tenant, user) -> roles
    pub user_roles: HashMap<(Uuid, Uuid), HashSet<Uuid>>,
    pub guides: Vec<Guide>,
    pub sections: Vec<GuideSection>,
    /// When set, every call fails as if the database were down.
    pub fail: bool,
}

impl Tables {
    fn check(&self) -> Result<(), DatabaseError> {
        if self.fail {
            return Err(DatabaseError::QueryError("simulated outage".to_string()));
        }
        Ok(())
    }

    fn hydrate(&self, mut booking: Booking) -> Booking {
        booking.status_code = booking
            .status_id
            .and_then(|id| self.config_values.iter().find(|v| v.id == id))
            .map(|v| v.code.clone());
        booking.property_name = self
            .properties
            .iter()
            .find(|p| p.id == booking.property_id)
            .map(|p| p.name.clone());
        let person = booking.person_id.and_then(|id| self.persons.iter().find(|p| p.id == id));
        booking.guest_first_name = person.map(|p| p.first_name.clone());
        booking.guest_last_name = person.map(|p| p.last_name.clone());
        booking
    }

    fn owns<T>(&self, rows: &[T], tenant_id: Uuid, id: Uuid, key: impl Fn(&T) -> (Uuid, Uuid)) -> bool {
        rows.iter().any(|r| key(r) == (tenant_id, id))
    }

    fn value_of_type(&self, tenant_id: Uuid, id: Uuid, type_code: &str) -> Result<(), DatabaseError> {
        let found = self.config_values.iter().any(|v| {
            v.tenant_id == tenant_id
                && v.id == id
                && self
                    .config_types
                    .iter()
                    .any(|t| t.id == v.type_id && t.tenant_id == tenant_id && t.code == type_code)
        });
        if !found {
            return Err(DatabaseError::NotFound(format!("Referenced {} value not found", type_code)));
        }
        Ok(())
    }

    fn check_booking_refs(&self, tenant_id: Uuid, input: &BookingInput) -> Result<(), DatabaseError> {
        if !self.owns(&self.properties, tenant_id, input.property_id, |p| (p.tenant_id, p.id)) {
            return Err(DatabaseError::NotFound("Referenced property not found".into()));
        }
        if let Some(person_id) = input.person_id {
            if !self.owns(&self.persons, tenant_id, person_id, |p| (p.tenant_id, p.id)) {
                return Err(DatabaseError::NotFound("Referenced person not found".into()));
            }
        }
        if let Some(channel_id) = input.sales_channel_id {
            if !self.owns(&self.sales_channels, tenant_id, channel_id, |c| (c.tenant_id, c.id)) {
                return Err(DatabaseError::NotFound("Referenced sales channel not found".into()));
            }
        }
        if let Some(status_id) = input.status_id {
            self.value_of_type(tenant_id, status_id, configuration::BOOKING_STATUS)?;
        }
        if let Some(type_id) = input.booking_type_id {
            self.value_of_type(tenant_id, type_id, configuration::BOOKING_TYPE)?;
        }
        Ok(())
    }

    fn slug_taken(&self, slug: &str, exclude_id: Option<Uuid>) -> bool {
        self.properties
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != exclude_id)
    }
}

#[derive(Clone, Default)]
pub struct MemoryDb {
    pub tables: Arc<RwLock<Tables>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> Store {
        let db = Arc::new(self.clone());
        Store::from_parts(
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db,
        )
    }
}

#[async_trait]
impl UserInfoRepository for MemoryDb {
    async fn get_user_info(&self, user_id: Uuid) -> Result<Option<UserInfo>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.users.iter().find(|u| u.user_id == user_id).cloned())
    }
}

#[async_trait]
impl BookingRepository for MemoryDb {
    async fn list(&self, tenant_id: Uuid, filter: &BookingFilter) -> Result<Vec<Booking>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        let mut rows: Vec<Booking> = t
            .bookings
            .iter()
            .filter(|b| b.tenant_id == tenant_id && filter.matches(b))
            .cloned()
            .map(|b| t.hydrate(b))
            .collect();
        rows.sort_by(|a, b| b.check_in.cmp(&a.check_in));
        Ok(rows)
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Booking>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.bookings
            .iter()
            .find(|b| b.tenant_id == tenant_id && b.id == id)
            .cloned()
            .map(|b| t.hydrate(b)))
    }

    async fn create(&self, tenant_id: Uuid, input: &BookingInput) -> Result<Booking, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        t.check_booking_refs(tenant_id, input)?;
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            tenant_id,
            property_id: input.property_id,
            person_id: input.person_id,
            check_in: input.check_in,
            check_out: input.check_out,
            guests: input.guests,
            status_id: input.status_id,
            booking_type_id: input.booking_type_id,
            sales_channel_id: input.sales_channel_id,
            total_amount: input.total_amount,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
            status_code: None,
            property_name: None,
            guest_first_name: None,
            guest_last_name: None,
        };
        t.bookings.push(booking.clone());
        Ok(t.hydrate(booking))
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: &BookingInput) -> Result<Option<Booking>, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        t.check_booking_refs(tenant_id, input)?;
        let Some(booking) = t.bookings.iter_mut().find(|b| b.tenant_id == tenant_id && b.id == id) else {
            return Ok(None);
        };
        booking.property_id = input.property_id;
        booking.person_id = input.person_id;
        booking.check_in = input.check_in;
        booking.check_out = input.check_out;
        booking.guests = input.guests;
        booking.status_id = input.status_id;
        booking.booking_type_id = input.booking_type_id;
        booking.sales_channel_id = input.sales_channel_id;
        booking.total_amount = input.total_amount;
        booking.notes = input.notes.clone();
        booking.updated_at = Utc::now();
        let updated = booking.clone();
        Ok(Some(t.hydrate(updated)))
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let before = t.bookings.len();
        t.bookings.retain(|b| !(b.tenant_id == tenant_id && b.id == id));
        Ok(t.bookings.len() < before)
    }

    async fn movements(&self, tenant_id: Uuid, booking_id: Uuid) -> Result<Option<Vec<Movement>>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        if !t.owns(&t.bookings, tenant_id, booking_id, |b| (b.tenant_id, b.id)) {
            return Ok(None);
        }
        Ok(Some(
            t.movements
                .iter()
                .filter(|m| m.tenant_id == tenant_id && m.booking_id == booking_id)
                .cloned()
                .collect(),
        ))
    }

    async fn add_movement(
        &self,
        tenant_id: Uuid,
        booking_id: Uuid,
        input: &MovementInput,
    ) -> Result<Option<Movement>, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        if !t.owns(&t.bookings, tenant_id, booking_id, |b| (b.tenant_id, b.id)) {
            return Ok(None);
        }
        if let Some(account_id) = input.treasury_account_id {
            if !t.owns(&t.treasury, tenant_id, account_id, |a| (a.tenant_id, a.id)) {
                return Err(DatabaseError::NotFound("Referenced treasury account not found".into()));
            }
        }
        if let Some(method_id) = input.payment_method_id {
            t.value_of_type(tenant_id, method_id, configuration::PAYMENT_METHOD)?;
        }
        let movement = Movement {
            id: Uuid::new_v4(),
            tenant_id,
            booking_id,
            treasury_account_id: input.treasury_account_id,
            amount: input.amount,
            movement_date: input.movement_date,
            concept: input.concept.clone(),
            payment_method_id: input.payment_method_id,
            created_at: Utc::now(),
        };
        t.movements.push(movement.clone());
        Ok(Some(movement))
    }
}

fn property_from_input(id: Uuid, tenant_id: Uuid, input: &PropertyInput) -> Property {
    let now = Utc::now();
    Property {
        id,
        tenant_id,
        name: input.name.clone(),
        slug: input.slug.clone(),
        description: input.description.clone(),
        address: input.address.clone(),
        city: input.city.clone(),
        country: input.country.clone(),
        latitude: input.latitude,
        longitude: input.longitude,
        google_place_id: input.google_place_id.clone(),
        max_guests: input.max_guests,
        bedrooms: input.bedrooms,
        bathrooms: input.bathrooms,
        base_price: input.base_price,
        is_active: input.is_active,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl PropertyRepository for MemoryDb {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<Property>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.properties.iter().filter(|p| p.tenant_id == tenant_id).cloned().collect())
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Property>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.properties.iter().find(|p| p.tenant_id == tenant_id && p.id == id).cloned())
    }

    async fn create(&self, tenant_id: Uuid, input: &PropertyInput) -> Result<Property, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        if t.slug_taken(&input.slug, None) {
            return Err(DatabaseError::Conflict("Property already exists".into()));
        }
        let property = property_from_input(Uuid::new_v4(), tenant_id, input);
        t.properties.push(property.clone());
        Ok(property)
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: &PropertyInput) -> Result<Option<Property>, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        if t.slug_taken(&input.slug, Some(id)) {
            return Err(DatabaseError::Conflict("Property already exists".into()));
        }
        let Some(existing) = t.properties.iter_mut().find(|p| p.tenant_id == tenant_id && p.id == id) else {
            return Ok(None);
        };
        let created_at = existing.created_at;
        *existing = Property {
            created_at,
            ..property_from_input(id, tenant_id, input)
        };
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let before = t.properties.len();
        t.properties.retain(|p| !(p.tenant_id == tenant_id && p.id == id));
        Ok(t.properties.len() < before)
    }

    async fn validate_slug_uniqueness(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(!t.slug_taken(slug, exclude_id))
    }

    async fn find_public(&self, property_id: Uuid) -> Result<Option<PublicProperty>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.properties
            .iter()
            .find(|p| p.id == property_id && p.is_active)
            .map(|p| PublicProperty {
                id: p.id,
                tenant_id: p.tenant_id,
                name: p.name.clone(),
                slug: p.slug.clone(),
            }))
    }

    async fn images(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PropertyImage>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.images
            .iter()
            .filter(|i| i.tenant_id == tenant_id && i.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn add_image(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        input: &PropertyImageInput,
    ) -> Result<PropertyImage, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let image = PropertyImage {
            id: Uuid::new_v4(),
            tenant_id,
            property_id,
            url: input.url.clone(),
            caption: input.caption.clone(),
            sort_order: input.sort_order,
        };
        t.images.push(image.clone());
        Ok(image)
    }

    async fn highlights(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PropertyHighlight>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.highlights
            .iter()
            .filter(|h| h.tenant_id == tenant_id && h.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn reviews(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PropertyReview>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.reviews
            .iter()
            .filter(|r| r.tenant_id == tenant_id && r.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn pricing_plans(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PricingPlan>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.pricing_plans
            .iter()
            .filter(|p| p.tenant_id == tenant_id && p.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn add_pricing_plan(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        input: &PricingPlanInput,
    ) -> Result<PricingPlan, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let plan = PricingPlan {
            id: Uuid::new_v4(),
            tenant_id,
            property_id,
            name: input.name.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            nightly_price: input.nightly_price,
            min_nights: input.min_nights,
        };
        t.pricing_plans.push(plan.clone());
        Ok(plan)
    }

    async fn closed_periods(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        window: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<ClosedPeriod>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.closed_periods
            .iter()
            .filter(|p| p.tenant_id == tenant_id && p.property_id == property_id)
            .filter(|p| window.map_or(true, |(from, to)| p.end_date >= from && p.start_date <= to))
            .cloned()
            .collect())
    }

    async fn add_closed_period(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        input: &ClosedPeriodInput,
    ) -> Result<ClosedPeriod, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let period = ClosedPeriod {
            id: Uuid::new_v4(),
            tenant_id,
            property_id,
            start_date: input.start_date,
            end_date: input.end_date,
            reason: input.reason.clone(),
        };
        t.closed_periods.push(period.clone());
        Ok(period)
    }

    async fn delete_closed_period(&self, tenant_id: Uuid, property_id: Uuid, period_id: Uuid) -> Result<bool, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let before = t.closed_periods.len();
        t.closed_periods
            .retain(|p| !(p.tenant_id == tenant_id && p.property_id == property_id && p.id == period_id));
        Ok(t.closed_periods.len() < before)
    }
}

fn person_from_input(id: Uuid, tenant_id: Uuid, input: &PersonInput) -> Person {
    let now = Utc::now();
    Person {
        id,
        tenant_id,
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        document_type: input.document_type.clone(),
        document_number: input.document_number.clone(),
        nationality: input.nationality.clone(),
        notes: input.notes.clone(),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl PersonRepository for MemoryDb {
    async fn list(&self, tenant_id: Uuid, filter: &PersonFilter) -> Result<Vec<Person>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        let term = filter.search.clone().unwrap_or_default();
        Ok(t.persons
            .iter()
            .filter(|p| p.tenant_id == tenant_id && p.matches_search(&term))
            .cloned()
            .collect())
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Person>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.persons.iter().find(|p| p.tenant_id == tenant_id && p.id == id).cloned())
    }

    async fn create(&self, tenant_id: Uuid, input: &PersonInput) -> Result<Person, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let person = person_from_input(Uuid::new_v4(), tenant_id, input);
        t.persons.push(person.clone());
        Ok(person)
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: &PersonInput) -> Result<Option<Person>, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let Some(existing) = t.persons.iter_mut().find(|p| p.tenant_id == tenant_id && p.id == id) else {
            return Ok(None);
        };
        let created_at = existing.created_at;
        *existing = Person {
            created_at,
            ..person_from_input(id, tenant_id, input)
        };
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let before = t.persons.len();
        t.persons.retain(|p| !(p.tenant_id == tenant_id && p.id == id));
        Ok(t.persons.len() < before)
    }
}

fn account_from_input(id: Uuid, tenant_id: Uuid, input: &TreasuryAccountInput) -> TreasuryAccount {
    let now = Utc::now();
    TreasuryAccount {
        id,
        tenant_id,
        name: input.name.clone(),
        account_type: input.account_type.clone(),
        currency: input.currency.to_uppercase(),
        balance: input.balance,
        is_active: input.is_active,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl TreasuryRepository for MemoryDb {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<TreasuryAccount>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.treasury.iter().filter(|a| a.tenant_id == tenant_id).cloned().collect())
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<TreasuryAccount>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.treasury.iter().find(|a| a.tenant_id == tenant_id && a.id == id).cloned())
    }

    async fn create(&self, tenant_id: Uuid, input: &TreasuryAccountInput) -> Result<TreasuryAccount, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let account = account_from_input(Uuid::new_v4(), tenant_id, input);
        t.treasury.push(account.clone());
        Ok(account)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: &TreasuryAccountInput,
    ) -> Result<Option<TreasuryAccount>, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let Some(existing) = t.treasury.iter_mut().find(|a| a.tenant_id == tenant_id && a.id == id) else {
            return Ok(None);
        };
        let created_at = existing.created_at;
        *existing = TreasuryAccount {
            created_at,
            ..account_from_input(id, tenant_id, input)
        };
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let before = t.treasury.len();
        t.treasury.retain(|a| !(a.tenant_id == tenant_id && a.id == id));
        Ok(t.treasury.len() < before)
    }
}

#[async_trait]
impl SalesChannelRepository for MemoryDb {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<SalesChannel>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.sales_channels.iter().filter(|c| c.tenant_id == tenant_id).cloned().collect())
    }

    async fn create(&self, tenant_id: Uuid, input: &SalesChannelInput) -> Result<SalesChannel, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let channel = SalesChannel {
            id: Uuid::new_v4(),
            tenant_id,
            name: input.name.clone(),
            commission_rate: input.commission_rate,
            is_active: input.is_active,
            created_at: Utc::now(),
        };
        t.sales_channels.push(channel.clone());
        Ok(channel)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: &SalesChannelInput,
    ) -> Result<Option<SalesChannel>, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let Some(channel) = t.sales_channels.iter_mut().find(|c| c.tenant_id == tenant_id && c.id == id) else {
            return Ok(None);
        };
        channel.name = input.name.clone();
        channel.commission_rate = input.commission_rate;
        channel.is_active = input.is_active;
        Ok(Some(channel.clone()))
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let before = t.sales_channels.len();
        t.sales_channels.retain(|c| !(c.tenant_id == tenant_id && c.id == id));
        Ok(t.sales_channels.len() < before)
    }
}

#[async_trait]
impl ConfigurationRepository for MemoryDb {
    async fn types(&self, tenant_id: Uuid) -> Result<Vec<ConfigurationType>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.config_types.iter().filter(|c| c.tenant_id == tenant_id).cloned().collect())
    }

    async fn values(&self, tenant_id: Uuid, type_code: &str) -> Result<Option<Vec<ConfigurationValue>>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        let Some(kind) = t.config_types.iter().find(|c| c.tenant_id == tenant_id && c.code == type_code) else {
            return Ok(None);
        };
        Ok(Some(
            t.config_values.iter().filter(|v| v.type_id == kind.id).cloned().collect(),
        ))
    }

    async fn add_value(
        &self,
        tenant_id: Uuid,
        type_code: &str,
        input: &ConfigurationValueInput,
    ) -> Result<Option<ConfigurationValue>, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let Some(type_id) = t
            .config_types
            .iter()
            .find(|c| c.tenant_id == tenant_id && c.code == type_code)
            .map(|c| c.id)
        else {
            return Ok(None);
        };
        let value = ConfigurationValue {
            id: Uuid::new_v4(),
            tenant_id,
            type_id,
            code: input.code.clone(),
            label: input.label.clone(),
            sort_order: input.sort_order,
            is_active: input.is_active,
        };
        t.config_values.push(value.clone());
        Ok(Some(value))
    }
}

#[async_trait]
impl RbacRepository for MemoryDb {
    async fn roles(&self, tenant_id: Uuid) -> Result<Vec<Role>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.roles.iter().filter(|r| r.tenant_id == tenant_id).cloned().collect())
    }

    async fn create_role(&self, tenant_id: Uuid, input: &RoleInput) -> Result<Role, DatabaseError> {
        let mut t = self.tables.write().await;
        t.check()?;
        let name = input.name.trim();
        if t.roles.iter().any(|r| r.tenant_id == tenant_id && r.name == name) {
            return Err(DatabaseError::Conflict("Role already exists".into()));
        }
        let role = Role {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.to_string(),
            description: input.description.clone(),
            is_system: false,
            created_at: Utc::now(),
        };
        t.roles.push(role.clone());
        Ok(role)
    }

    async fn permissions(&self) -> Result<Vec<Permission>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.permissions.clone())
    }

    async fn role_permissions(&self, tenant_id: Uuid, role_id: Uuid) -> Result<Option<Vec<Permission>>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        if !t.owns(&t.roles, tenant_id, role_id, |r| (r.tenant_id, r.id)) {
            return Ok(None);
        }
        let granted = t.role_permissions.get(&role_id).cloned().unwrap_or_default();
        Ok(Some(
            t.permissions.iter().filter(|p| granted.contains(&p.id)).cloned().collect(),
        ))
    }

    async fn set_role_permissions(
        &self,
        tenant_id: Uuid,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> Result<Option<Vec<Permission>>, DatabaseError> {
        {
            let mut t = self.tables.write().await;
            t.check()?;
            if !t.owns(&t.roles, tenant_id, role_id, |r| (r.tenant_id, r.id)) {
                return Ok(None);
            }
            if permission_ids.iter().any(|id| !t.permissions.iter().any(|p| p.id == *id)) {
                return Err(DatabaseError::NotFound("Permission not found".into()));
            }
            t.role_permissions.insert(role_id, permission_ids.iter().copied().collect());
        }
        self.role_permissions(tenant_id, role_id).await
    }

    async fn user_roles(&self, tenant_id: Uuid, user_id: Uuid) -> Result<Option<Vec<Role>>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        if !t.users.iter().any(|u| u.tenant_id == tenant_id && u.user_id == user_id) {
            return Ok(None);
        }
        let assigned = t.user_roles.get(&(tenant_id, user_id)).cloned().unwrap_or_default();
        Ok(Some(t.roles.iter().filter(|r| assigned.contains(&r.id)).cloned().collect()))
    }

    async fn set_user_roles(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        role_ids: &[Uuid],
    ) -> Result<Option<Vec<Role>>, DatabaseError> {
        {
            let mut t = self.tables.write().await;
            t.check()?;
            if !t.users.iter().any(|u| u.tenant_id == tenant_id && u.user_id == user_id) {
                return Ok(None);
            }
            if role_ids
                .iter()
                .any(|id| !t.owns(&t.roles, tenant_id, *id, |r| (r.tenant_id, r.id)))
            {
                return Err(DatabaseError::NotFound("Role not found".into()));
            }
            t.user_roles.insert((tenant_id, user_id), role_ids.iter().copied().collect());
        }
        self.user_roles(tenant_id, user_id).await
    }
}

#[async_trait]
impl GuideRepository for MemoryDb {
    async fn find_published(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Option<Guide>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        Ok(t.guides
            .iter()
            .find(|g| g.tenant_id == tenant_id && g.property_id == property_id && g.is_published)
            .cloned())
    }

    async fn sections(&self, tenant_id: Uuid, guide_id: Uuid) -> Result<Vec<GuideSection>, DatabaseError> {
        let t = self.tables.read().await;
        t.check()?;
        if !t.owns(&t.guides, tenant_id, guide_id, |g| (g.tenant_id, g.id)) {
            return Ok(Vec::new());
        }
        let mut sections: Vec<GuideSection> = t.sections.iter().filter(|s| s.guide_id == guide_id).cloned().collect();
        sections.sort_by_key(|s| s.sort_order);
        Ok(sections)
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    ClosedPeriod, ClosedPeriodInput, PricingPlan, PricingPlanInput, Property, PropertyHighlight,
    PropertyImage, PropertyImageInput, PropertyInput, PropertyReview, PublicProperty,
};

use super::ensure_in_tenant;

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<Property>, DatabaseError>;

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Property>, DatabaseError>;

    async fn create(&self, tenant_id: Uuid, input: &PropertyInput) -> Result<Property, DatabaseError>;

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: &PropertyInput,
    ) -> Result<Option<Property>, DatabaseError>;

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError>;

    /// True iff no property other than `exclude_id` uses `slug`. Slugs back public
    /// URLs, so uniqueness spans every tenant.
    async fn validate_slug_uniqueness(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, DatabaseError>;

    /// Unscoped lookup used by public routes to learn a property's tenant.
    async fn find_public(&self, property_id: Uuid) -> Result<Option<PublicProperty>, DatabaseError>;

    async fn images(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PropertyImage>, DatabaseError>;

    async fn add_image(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        input: &PropertyImageInput,
    ) -> Result<PropertyImage, DatabaseError>;

    async fn highlights(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PropertyHighlight>, DatabaseError>;

    async fn reviews(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PropertyReview>, DatabaseError>;

    async fn pricing_plans(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PricingPlan>, DatabaseError>;

    async fn add_pricing_plan(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        input: &PricingPlanInput,
    ) -> Result<PricingPlan, DatabaseError>;

    /// Closed periods, optionally only those touching `[from, to]`.
    async fn closed_periods(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        window: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<ClosedPeriod>, DatabaseError>;

    async fn add_closed_period(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        input: &ClosedPeriodInput,
    ) -> Result<ClosedPeriod, DatabaseError>;

    async fn delete_closed_period(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        period_id: Uuid,
    ) -> Result<bool, DatabaseError>;
}

const PROPERTY_COLUMNS: &str = "id, tenant_id, name, slug, description, address, city, country, \
     latitude, longitude, google_place_id, max_guests, bedrooms, bathrooms, base_price, is_active, \
     created_at, updated_at";

pub struct PgPropertyRepository {
    pool: PgPool,
}

impl PgPropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyRepository for PgPropertyRepository {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<Property>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM properties WHERE tenant_id = $1 ORDER BY name",
            PROPERTY_COLUMNS
        );
        let rows = sqlx::query_as::<_, Property>(&sql)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Property>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM properties WHERE tenant_id = $1 AND id = $2",
            PROPERTY_COLUMNS
        );
        let row = sqlx::query_as::<_, Property>(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, tenant_id: Uuid, input: &PropertyInput) -> Result<Property, DatabaseError> {
        let sql = format!(
            "INSERT INTO properties (tenant_id, name, slug, description, address, city, country, \
                 latitude, longitude, google_place_id, max_guests, bedrooms, bathrooms, base_price, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {}",
            PROPERTY_COLUMNS
        );
        let row = sqlx::query_as::<_, Property>(&sql)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.country)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.google_place_id)
            .bind(input.max_guests)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.base_price)
            .bind(input.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Property slug"))?;
        Ok(row)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: &PropertyInput,
    ) -> Result<Option<Property>, DatabaseError> {
        let sql = format!(
            "UPDATE properties SET name = $3, slug = $4, description = $5, address = $6, city = $7, \
                 country = $8, latitude = $9, longitude = $10, google_place_id = $11, max_guests = $12, \
                 bedrooms = $13, bathrooms = $14, base_price = $15, is_active = $16, updated_at = now() \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {}",
            PROPERTY_COLUMNS
        );
        let row = sqlx::query_as::<_, Property>(&sql)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.country)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.google_place_id)
            .bind(input.max_guests)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.base_price)
            .bind(input.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Property slug"))?;
        Ok(row)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM properties WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Property"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn validate_slug_uniqueness(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, DatabaseError> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM properties WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(!taken)
    }

    async fn find_public(&self, property_id: Uuid) -> Result<Option<PublicProperty>, DatabaseError> {
        let row = sqlx::query_as::<_, PublicProperty>(
            "SELECT id, tenant_id, name, slug FROM properties WHERE id = $1 AND is_active = true",
        )
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn images(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PropertyImage>, DatabaseError> {
        let rows = sqlx::query_as::<_, PropertyImage>(
            "SELECT id, tenant_id, property_id, url, caption, sort_order FROM property_images \
             WHERE tenant_id = $1 AND property_id = $2 ORDER BY sort_order, id",
        )
        .bind(tenant_id)
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn add_image(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        input: &PropertyImageInput,
    ) -> Result<PropertyImage, DatabaseError> {
        ensure_in_tenant(&self.pool, "properties", tenant_id, property_id).await?;
        let row = sqlx::query_as::<_, PropertyImage>(
            "INSERT INTO property_images (tenant_id, property_id, url, caption, sort_order) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, tenant_id, property_id, url, caption, sort_order",
        )
        .bind(tenant_id)
        .bind(property_id)
        .bind(&input.url)
        .bind(&input.caption)
        .bind(input.sort_order)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn highlights(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PropertyHighlight>, DatabaseError> {
        let rows = sqlx::query_as::<_, PropertyHighlight>(
            "SELECT id, tenant_id, property_id, title, description, icon, sort_order FROM property_highlights \
             WHERE tenant_id = $1 AND property_id = $2 ORDER BY sort_order, id",
        )
        .bind(tenant_id)
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn reviews(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PropertyReview>, DatabaseError> {
        let rows = sqlx::query_as::<_, PropertyReview>(
            "SELECT id, tenant_id, property_id, author_name, rating, comment, created_at FROM property_reviews \
             WHERE tenant_id = $1 AND property_id = $2 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn pricing_plans(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Vec<PricingPlan>, DatabaseError> {
        let rows = sqlx::query_as::<_, PricingPlan>(
            "SELECT id, tenant_id, property_id, name, start_date, end_date, nightly_price, min_nights \
             FROM pricing_plans WHERE tenant_id = $1 AND property_id = $2 ORDER BY start_date",
        )
        .bind(tenant_id)
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn add_pricing_plan(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        input: &PricingPlanInput,
    ) -> Result<PricingPlan, DatabaseError> {
        ensure_in_tenant(&self.pool, "properties", tenant_id, property_id).await?;
        let row = sqlx::query_as::<_, PricingPlan>(
            "INSERT INTO pricing_plans (tenant_id, property_id, name, start_date, end_date, nightly_price, min_nights) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, tenant_id, property_id, name, start_date, end_date, nightly_price, min_nights",
        )
        .bind(tenant_id)
        .bind(property_id)
        .bind(&input.name)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.nightly_price)
        .bind(input.min_nights)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn closed_periods(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        window: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<ClosedPeriod>, DatabaseError> {
        let (from, to) = window.unzip();
        let rows = sqlx::query_as::<_, ClosedPeriod>(
            "SELECT id, tenant_id, property_id, start_date, end_date, reason FROM closed_periods \
             WHERE tenant_id = $1 AND property_id = $2 \
               AND ($3::date IS NULL OR end_date >= $3) \
               AND ($4::date IS NULL OR start_date <= $4) \
             ORDER BY start_date",
        )
        .bind(tenant_id)
        .bind(property_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn add_closed_period(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        input: &ClosedPeriodInput,
    ) -> Result<ClosedPeriod, DatabaseError> {
        ensure_in_tenant(&self.pool, "properties", tenant_id, property_id).await?;
        let row = sqlx::query_as::<_, ClosedPeriod>(
            "INSERT INTO closed_periods (tenant_id, property_id, start_date, end_date, reason) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, tenant_id, property_id, start_date, end_date, reason",
        )
        .bind(tenant_id)
        .bind(property_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_closed_period(
        &self,
        tenant_id: Uuid,
        property_id: Uuid,
        period_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM closed_periods WHERE tenant_id = $1 AND property_id = $2 AND id = $3",
        )
        .bind(tenant_id)
        .bind(property_id)
        .bind(period_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

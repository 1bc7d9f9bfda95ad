pub mod bookings;
pub mod calendar;
pub mod configuration;
pub mod dashboard;
pub mod guide_access;
pub mod guides;
pub mod persons;
pub mod places;
pub mod properties;
pub mod rbac;
pub mod sales_channels;
pub mod treasury;
pub mod user_info;

use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::manager::DatabaseError;

pub use bookings::{BookingRepository, PgBookingRepository};
pub use configuration::{ConfigurationRepository, PgConfigurationRepository};
pub use guides::{GuideRepository, PgGuideRepository};
pub use persons::{PersonRepository, PgPersonRepository};
pub use places::{PlacesClient, PlacesError};
pub use properties::{PgPropertyRepository, PropertyRepository};
pub use rbac::{PgRbacRepository, RbacRepository};
pub use sales_channels::{PgSalesChannelRepository, SalesChannelRepository};
pub use treasury::{PgTreasuryRepository, TreasuryRepository};
pub use user_info::{PgUserInfoRepository, UserInfoRepository};

/// The data-access layer, one repository per domain. Every tenant-scoped call
/// takes the gate-resolved `tenant_id` first.
#[derive(Clone)]
pub struct Store {
    pub user_info: Arc<dyn UserInfoRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub properties: Arc<dyn PropertyRepository>,
    pub persons: Arc<dyn PersonRepository>,
    pub treasury: Arc<dyn TreasuryRepository>,
    pub sales_channels: Arc<dyn SalesChannelRepository>,
    pub configuration: Arc<dyn ConfigurationRepository>,
    pub rbac: Arc<dyn RbacRepository>,
    pub guides: Arc<dyn GuideRepository>,
    pool: Option<PgPool>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            user_info: Arc::new(PgUserInfoRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool.clone())),
            properties: Arc::new(PgPropertyRepository::new(pool.clone())),
            persons: Arc::new(PgPersonRepository::new(pool.clone())),
            treasury: Arc::new(PgTreasuryRepository::new(pool.clone())),
            sales_channels: Arc::new(PgSalesChannelRepository::new(pool.clone())),
            configuration: Arc::new(PgConfigurationRepository::new(pool.clone())),
            rbac: Arc::new(PgRbacRepository::new(pool.clone())),
            guides: Arc::new(PgGuideRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Assemble a store from arbitrary repositories (in-memory doubles in tests).
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        user_info: Arc<dyn UserInfoRepository>,
        bookings: Arc<dyn BookingRepository>,
        properties: Arc<dyn PropertyRepository>,
        persons: Arc<dyn PersonRepository>,
        treasury: Arc<dyn TreasuryRepository>,
        sales_channels: Arc<dyn SalesChannelRepository>,
        configuration: Arc<dyn ConfigurationRepository>,
        rbac: Arc<dyn RbacRepository>,
        guides: Arc<dyn GuideRepository>,
    ) -> Self {
        Self {
            user_info,
            bookings,
            properties,
            persons,
            treasury,
            sales_channels,
            configuration,
            rbac,
            guides,
            pool: None,
        }
    }

    /// Underlying pool, absent for non-Postgres stores.
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }
}

/// Fails with `NotFound` unless row `id` of `table` belongs to `tenant_id`.
/// `table` is always a compile-time constant, never request input.
pub(crate) async fn ensure_in_tenant(
    pool: &PgPool,
    table: &'static str,
    tenant_id: Uuid,
    id: Uuid,
) -> Result<(), DatabaseError> {
    let sql = format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE tenant_id = $1 AND id = $2)",
        table
    );
    let (exists,): (bool,) = sqlx::query_as(&sql)
        .bind(tenant_id)
        .bind(id)
        .fetch_one(pool)
        .await?;

    if !exists {
        return Err(DatabaseError::NotFound(format!("Referenced {} not found", entity_name(table))));
    }
    Ok(())
}

/// Fails with `NotFound` unless value `id` belongs to `tenant_id` and to the
/// configuration type `type_code`.
pub(crate) async fn ensure_config_value(
    pool: &PgPool,
    tenant_id: Uuid,
    id: Uuid,
    type_code: &str,
) -> Result<(), DatabaseError> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM configuration_values v
            JOIN configuration_types t ON t.id = v.type_id AND t.tenant_id = v.tenant_id
            WHERE v.tenant_id = $1 AND v.id = $2 AND t.code = $3
        )
        "#,
    )
    .bind(tenant_id)
    .bind(id)
    .bind(type_code)
    .fetch_one(pool)
    .await?;

    if !exists {
        return Err(DatabaseError::NotFound(format!("Referenced {} value not found", type_code)));
    }
    Ok(())
}

fn entity_name(table: &str) -> &str {
    match table {
        "properties" => "property",
        "persons" => "person",
        "sales_channels" => "sales channel",
        "treasury_accounts" => "treasury account",
        other => other,
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{ConfigurationType, ConfigurationValue, ConfigurationValueInput};

#[async_trait]
pub trait ConfigurationRepository: Send + Sync {
    async fn types(&self, tenant_id: Uuid) -> Result<Vec<ConfigurationType>, DatabaseError>;

    /// Values of the type with `type_code`; `None` when the tenant has no such type.
    async fn values(&self, tenant_id: Uuid, type_code: &str) -> Result<Option<Vec<ConfigurationValue>>, DatabaseError>;

    async fn add_value(
        &self,
        tenant_id: Uuid,
        type_code: &str,
        input: &ConfigurationValueInput,
    ) -> Result<Option<ConfigurationValue>, DatabaseError>;
}

const VALUE_COLUMNS: &str = "id, tenant_id, type_id, code, label, sort_order, is_active";

pub struct PgConfigurationRepository {
    pool: PgPool,
}

impl PgConfigurationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn type_id(&self, tenant_id: Uuid, type_code: &str) -> Result<Option<Uuid>, DatabaseError> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM configuration_types WHERE tenant_id = $1 AND code = $2")
                .bind(tenant_id)
                .bind(type_code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id,)| id))
    }
}

#[async_trait]
impl ConfigurationRepository for PgConfigurationRepository {
    async fn types(&self, tenant_id: Uuid) -> Result<Vec<ConfigurationType>, DatabaseError> {
        let rows = sqlx::query_as::<_, ConfigurationType>(
            "SELECT id, tenant_id, code, name FROM configuration_types WHERE tenant_id = $1 ORDER BY name",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn values(&self, tenant_id: Uuid, type_code: &str) -> Result<Option<Vec<ConfigurationValue>>, DatabaseError> {
        let Some(type_id) = self.type_id(tenant_id, type_code).await? else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {} FROM configuration_values WHERE tenant_id = $1 AND type_id = $2 \
             ORDER BY sort_order, label",
            VALUE_COLUMNS
        );
        let rows = sqlx::query_as::<_, ConfigurationValue>(&sql)
            .bind(tenant_id)
            .bind(type_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(Some(rows))
    }

    async fn add_value(
        &self,
        tenant_id: Uuid,
        type_code: &str,
        input: &ConfigurationValueInput,
    ) -> Result<Option<ConfigurationValue>, DatabaseError> {
        let Some(type_id) = self.type_id(tenant_id, type_code).await? else {
            return Ok(None);
        };

        let sql = format!(
            "INSERT INTO configuration_values (tenant_id, type_id, code, label, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            VALUE_COLUMNS
        );
        let row = sqlx::query_as::<_, ConfigurationValue>(&sql)
            .bind(tenant_id)
            .bind(type_id)
            .bind(&input.code)
            .bind(&input.label)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Configuration value"))?;
        Ok(Some(row))
    }
}

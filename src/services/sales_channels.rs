use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{SalesChannel, SalesChannelInput};

#[async_trait]
pub trait SalesChannelRepository: Send + Sync {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<SalesChannel>, DatabaseError>;

    async fn create(&self, tenant_id: Uuid, input: &SalesChannelInput) -> Result<SalesChannel, DatabaseError>;

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: &SalesChannelInput,
    ) -> Result<Option<SalesChannel>, DatabaseError>;

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError>;
}

const CHANNEL_COLUMNS: &str = "id, tenant_id, name, commission_rate, is_active, created_at";

pub struct PgSalesChannelRepository {
    pool: PgPool,
}

impl PgSalesChannelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesChannelRepository for PgSalesChannelRepository {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<SalesChannel>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM sales_channels WHERE tenant_id = $1 ORDER BY name",
            CHANNEL_COLUMNS
        );
        let rows = sqlx::query_as::<_, SalesChannel>(&sql)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, tenant_id: Uuid, input: &SalesChannelInput) -> Result<SalesChannel, DatabaseError> {
        let sql = format!(
            "INSERT INTO sales_channels (tenant_id, name, commission_rate, is_active) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            CHANNEL_COLUMNS
        );
        let row = sqlx::query_as::<_, SalesChannel>(&sql)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(input.commission_rate)
            .bind(input.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Sales channel"))?;
        Ok(row)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: &SalesChannelInput,
    ) -> Result<Option<SalesChannel>, DatabaseError> {
        let sql = format!(
            "UPDATE sales_channels SET name = $3, commission_rate = $4, is_active = $5 \
             WHERE tenant_id = $1 AND id = $2 RETURNING {}",
            CHANNEL_COLUMNS
        );
        let row = sqlx::query_as::<_, SalesChannel>(&sql)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(input.commission_rate)
            .bind(input.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Sales channel"))?;
        Ok(row)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM sales_channels WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Sales channel"))?;
        Ok(result.rows_affected() > 0)
    }
}

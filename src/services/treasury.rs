use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{TreasuryAccount, TreasuryAccountInput};

#[async_trait]
pub trait TreasuryRepository: Send + Sync {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<TreasuryAccount>, DatabaseError>;

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<TreasuryAccount>, DatabaseError>;

    async fn create(&self, tenant_id: Uuid, input: &TreasuryAccountInput) -> Result<TreasuryAccount, DatabaseError>;

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: &TreasuryAccountInput,
    ) -> Result<Option<TreasuryAccount>, DatabaseError>;

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError>;
}

const ACCOUNT_COLUMNS: &str =
    "id, tenant_id, name, account_type, currency, balance, is_active, created_at, updated_at";

pub struct PgTreasuryRepository {
    pool: PgPool,
}

impl PgTreasuryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TreasuryRepository for PgTreasuryRepository {
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<TreasuryAccount>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM treasury_accounts WHERE tenant_id = $1 ORDER BY name",
            ACCOUNT_COLUMNS
        );
        let rows = sqlx::query_as::<_, TreasuryAccount>(&sql)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<TreasuryAccount>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM treasury_accounts WHERE tenant_id = $1 AND id = $2",
            ACCOUNT_COLUMNS
        );
        let row = sqlx::query_as::<_, TreasuryAccount>(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, tenant_id: Uuid, input: &TreasuryAccountInput) -> Result<TreasuryAccount, DatabaseError> {
        let sql = format!(
            "INSERT INTO treasury_accounts (tenant_id, name, account_type, currency, balance, is_active) \
             VALUES ($1, $2, $3, upper($4), $5, $6) RETURNING {}",
            ACCOUNT_COLUMNS
        );
        let row = sqlx::query_as::<_, TreasuryAccount>(&sql)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.account_type)
            .bind(&input.currency)
            .bind(input.balance)
            .bind(input.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Treasury account"))?;
        Ok(row)
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: &TreasuryAccountInput,
    ) -> Result<Option<TreasuryAccount>, DatabaseError> {
        let sql = format!(
            "UPDATE treasury_accounts SET name = $3, account_type = $4, currency = upper($5), \
                 balance = $6, is_active = $7, updated_at = now() \
             WHERE tenant_id = $1 AND id = $2 RETURNING {}",
            ACCOUNT_COLUMNS
        );
        let row = sqlx::query_as::<_, TreasuryAccount>(&sql)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.account_type)
            .bind(&input.currency)
            .bind(input.balance)
            .bind(input.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Treasury account"))?;
        Ok(row)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM treasury_accounts WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Treasury account"))?;
        Ok(result.rows_affected() > 0)
    }
}

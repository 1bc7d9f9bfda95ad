use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Person, PersonFilter, PersonInput};

#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn list(&self, tenant_id: Uuid, filter: &PersonFilter) -> Result<Vec<Person>, DatabaseError>;

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Person>, DatabaseError>;

    async fn create(&self, tenant_id: Uuid, input: &PersonInput) -> Result<Person, DatabaseError>;

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: &PersonInput) -> Result<Option<Person>, DatabaseError>;

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError>;
}

const PERSON_COLUMNS: &str = "id, tenant_id, first_name, last_name, email, phone, document_type, \
     document_number, nationality, notes, created_at, updated_at";

pub struct PgPersonRepository {
    pool: PgPool,
}

impl PgPersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepository for PgPersonRepository {
    async fn list(&self, tenant_id: Uuid, filter: &PersonFilter) -> Result<Vec<Person>, DatabaseError> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.replace('%', "\\%").replace('_', "\\_")));

        let sql = format!(
            "SELECT {} FROM persons WHERE tenant_id = $1 \
               AND ($2::text IS NULL OR first_name ILIKE $2 OR last_name ILIKE $2 \
                    OR email ILIKE $2 OR document_number ILIKE $2) \
             ORDER BY last_name, first_name",
            PERSON_COLUMNS
        );
        let rows = sqlx::query_as::<_, Person>(&sql)
            .bind(tenant_id)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Person>, DatabaseError> {
        let sql = format!("SELECT {} FROM persons WHERE tenant_id = $1 AND id = $2", PERSON_COLUMNS);
        let row = sqlx::query_as::<_, Person>(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, tenant_id: Uuid, input: &PersonInput) -> Result<Person, DatabaseError> {
        let sql = format!(
            "INSERT INTO persons (tenant_id, first_name, last_name, email, phone, document_type, \
                 document_number, nationality, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            PERSON_COLUMNS
        );
        let row = sqlx::query_as::<_, Person>(&sql)
            .bind(tenant_id)
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.document_type)
            .bind(&input.document_number)
            .bind(&input.nationality)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Person"))?;
        Ok(row)
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: &PersonInput) -> Result<Option<Person>, DatabaseError> {
        let sql = format!(
            "UPDATE persons SET first_name = $3, last_name = $4, email = $5, phone = $6, \
                 document_type = $7, document_number = $8, nationality = $9, notes = $10, updated_at = now() \
             WHERE tenant_id = $1 AND id = $2 RETURNING {}",
            PERSON_COLUMNS
        );
        let row = sqlx::query_as::<_, Person>(&sql)
            .bind(tenant_id)
            .bind(id)
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.document_type)
            .bind(&input.document_number)
            .bind(&input.nationality)
            .bind(&input.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Person"))?;
        Ok(row)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM persons WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Person"))?;
        Ok(result.rows_affected() > 0)
    }
}

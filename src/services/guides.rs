use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Guide, GuideSection};

#[async_trait]
pub trait GuideRepository: Send + Sync {
    /// The published guide of a property, if any.
    async fn find_published(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Option<Guide>, DatabaseError>;

    async fn sections(&self, tenant_id: Uuid, guide_id: Uuid) -> Result<Vec<GuideSection>, DatabaseError>;
}

pub struct PgGuideRepository {
    pool: PgPool,
}

impl PgGuideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuideRepository for PgGuideRepository {
    async fn find_published(&self, tenant_id: Uuid, property_id: Uuid) -> Result<Option<Guide>, DatabaseError> {
        let row = sqlx::query_as::<_, Guide>(
            "SELECT id, tenant_id, property_id, title, welcome_message, is_published FROM property_guides \
             WHERE tenant_id = $1 AND property_id = $2 AND is_published = true",
        )
        .bind(tenant_id)
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn sections(&self, tenant_id: Uuid, guide_id: Uuid) -> Result<Vec<GuideSection>, DatabaseError> {
        let rows = sqlx::query_as::<_, GuideSection>(
            "SELECT s.id, s.guide_id, s.title, s.content, s.sort_order FROM guide_sections s \
             JOIN property_guides g ON g.id = s.guide_id \
             WHERE g.tenant_id = $1 AND s.guide_id = $2 ORDER BY s.sort_order, s.id",
        )
        .bind(tenant_id)
        .bind(guide_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::UserInfo;

/// Maps an authenticated identity to its tenant. The hosted database exposes
/// this as the `get_user_info` stored procedure.
#[async_trait]
pub trait UserInfoRepository: Send + Sync {
    async fn get_user_info(&self, user_id: Uuid) -> Result<Option<UserInfo>, DatabaseError>;
}

pub struct PgUserInfoRepository {
    pool: PgPool,
}

impl PgUserInfoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserInfoRepository for PgUserInfoRepository {
    async fn get_user_info(&self, user_id: Uuid) -> Result<Option<UserInfo>, DatabaseError> {
        // A user belongs to exactly one tenant; extra rows would be a data error, take the first.
        let row = sqlx::query_as::<_, UserInfo>(
            r#"
            SELECT
                user_id, tenant_id, email, full_name,
                COALESCE(roles, '{}'::text[]) AS roles,
                COALESCE(permissions, '{}'::text[]) AS permissions
            FROM get_user_info($1)
            WHERE tenant_id IS NOT NULL
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

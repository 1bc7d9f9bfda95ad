use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Permission, Role, RoleInput};

#[async_trait]
pub trait RbacRepository: Send + Sync {
    async fn roles(&self, tenant_id: Uuid) -> Result<Vec<Role>, DatabaseError>;

    async fn create_role(&self, tenant_id: Uuid, input: &RoleInput) -> Result<Role, DatabaseError>;

    /// The global permission catalog.
    async fn permissions(&self) -> Result<Vec<Permission>, DatabaseError>;

    /// `None` when the role is not in the tenant.
    async fn role_permissions(&self, tenant_id: Uuid, role_id: Uuid) -> Result<Option<Vec<Permission>>, DatabaseError>;

    /// Replace the role's permission set. Unknown permission ids are rejected.
    async fn set_role_permissions(
        &self,
        tenant_id: Uuid,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> Result<Option<Vec<Permission>>, DatabaseError>;

    /// `None` when the user is not a member of the tenant.
    async fn user_roles(&self, tenant_id: Uuid, user_id: Uuid) -> Result<Option<Vec<Role>>, DatabaseError>;

    /// Replace the user's roles. Every role must belong to the tenant.
    async fn set_user_roles(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        role_ids: &[Uuid],
    ) -> Result<Option<Vec<Role>>, DatabaseError>;
}

const ROLE_COLUMNS: &str = "r.id, r.tenant_id, r.name, r.description, r.is_system, r.created_at";

pub struct PgRbacRepository {
    pool: PgPool,
}

impl PgRbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn role_exists(&self, tenant_id: Uuid, role_id: Uuid) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM roles WHERE tenant_id = $1 AND id = $2)")
                .bind(tenant_id)
                .bind(role_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn is_member(&self, tenant_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM user_profiles WHERE tenant_id = $1 AND user_id = $2)",
        )
        .bind(tenant_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[async_trait]
impl RbacRepository for PgRbacRepository {
    async fn roles(&self, tenant_id: Uuid) -> Result<Vec<Role>, DatabaseError> {
        let sql = format!("SELECT {} FROM roles r WHERE r.tenant_id = $1 ORDER BY r.name", ROLE_COLUMNS);
        let rows = sqlx::query_as::<_, Role>(&sql)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_role(&self, tenant_id: Uuid, input: &RoleInput) -> Result<Role, DatabaseError> {
        let row = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (tenant_id, name, description, is_system) VALUES ($1, $2, $3, false) \
             RETURNING id, tenant_id, name, description, is_system, created_at",
        )
        .bind(tenant_id)
        .bind(input.name.trim())
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "Role"))?;
        Ok(row)
    }

    async fn permissions(&self) -> Result<Vec<Permission>, DatabaseError> {
        let rows = sqlx::query_as::<_, Permission>("SELECT id, code, description FROM permissions ORDER BY code")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn role_permissions(&self, tenant_id: Uuid, role_id: Uuid) -> Result<Option<Vec<Permission>>, DatabaseError> {
        if !self.role_exists(tenant_id, role_id).await? {
            return Ok(None);
        }
        let rows = sqlx::query_as::<_, Permission>(
            "SELECT p.id, p.code, p.description FROM permissions p \
             JOIN role_permissions rp ON rp.permission_id = p.id \
             WHERE rp.role_id = $1 ORDER BY p.code",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(Some(rows))
    }

    async fn set_role_permissions(
        &self,
        tenant_id: Uuid,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> Result<Option<Vec<Permission>>, DatabaseError> {
        if !self.role_exists(tenant_id, role_id).await? {
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;

        let (known,): (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT id) FROM permissions WHERE id = ANY($1)")
            .bind(permission_ids)
            .fetch_one(&mut *tx)
            .await?;
        let mut requested = permission_ids.to_vec();
        requested.sort();
        requested.dedup();
        if known as usize != requested.len() {
            return Err(DatabaseError::NotFound("Permission not found".to_string()));
        }

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) SELECT $1, unnest($2::uuid[])",
        )
        .bind(role_id)
        .bind(&requested)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.role_permissions(tenant_id, role_id).await
    }

    async fn user_roles(&self, tenant_id: Uuid, user_id: Uuid) -> Result<Option<Vec<Role>>, DatabaseError> {
        if !self.is_member(tenant_id, user_id).await? {
            return Ok(None);
        }
        let sql = format!(
            "SELECT {} FROM roles r JOIN user_roles ur ON ur.role_id = r.id \
             WHERE r.tenant_id = $1 AND ur.user_id = $2 ORDER BY r.name",
            ROLE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Role>(&sql)
            .bind(tenant_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(Some(rows))
    }

    async fn set_user_roles(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        role_ids: &[Uuid],
    ) -> Result<Option<Vec<Role>>, DatabaseError> {
        if !self.is_member(tenant_id, user_id).await? {
            return Ok(None);
        }

        let mut requested = role_ids.to_vec();
        requested.sort();
        requested.dedup();

        let mut tx = self.pool.begin().await?;

        let (owned,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM roles WHERE tenant_id = $1 AND id = ANY($2)")
            .bind(tenant_id)
            .bind(&requested)
            .fetch_one(&mut *tx)
            .await?;
        if owned as usize != requested.len() {
            return Err(DatabaseError::NotFound("Role not found".to_string()));
        }

        sqlx::query("DELETE FROM user_roles WHERE tenant_id = $1 AND user_id = $2")
            .bind(tenant_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO user_roles (tenant_id, user_id, role_id) SELECT $1, $2, unnest($3::uuid[])",
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(&requested)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.user_roles(tenant_id, user_id).await
    }
}

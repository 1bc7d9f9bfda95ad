use serde::Serialize;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::UserInfo;
use crate::services::Store;

/// Caller identity plus the tenant every downstream query is scoped to.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub user: UserInfo,
    pub tenant_id: Uuid,
}

/// Repositories handed to protected handlers once the gate has passed.
#[derive(Clone)]
pub struct TenantStore(pub Store);

/// Map an authenticated user onto their tenant. `Ok(None)` means the lookup
/// returned no rows.
pub async fn resolve_tenant(store: &Store, user_id: Uuid) -> Result<Option<AuthContext>, DatabaseError> {
    let info = store.user_info.get_user_info(user_id).await?;
    Ok(info.map(|user| AuthContext {
        tenant_id: user.tenant_id,
        user,
    }))
}

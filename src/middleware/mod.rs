pub mod auth;
pub mod extract;
pub mod gate;
pub mod response;
pub mod validate_tenant;

pub use auth::{resolve_session, AuthUser};
pub use extract::{ApiPath, ApiQuery, ValidatedJson};
pub use gate::{authorize, require_tenant, Authorization, Denial};
pub use response::{found, ApiResponse, ApiResult};
pub use validate_tenant::{resolve_tenant, AuthContext, TenantStore};

// handlers/protected/mod.rs - Tenant-scoped endpoints
//
// Every route here sits behind `middleware::require_tenant`, which injects
// `AuthContext` and `TenantStore`. Handlers pass `ctx.tenant_id` as the first
// argument of every repository call.

pub mod auth;
pub mod bookings;
pub mod configuration;
pub mod dashboard;
pub mod persons;
pub mod places;
pub mod properties;
pub mod rbac;
pub mod sales_channels;
pub mod treasury;

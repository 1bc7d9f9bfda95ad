// handlers/mod.rs - Two-tier handler layout
//
// public:    no session required (/, /health, /api/public/*)
// protected: session + tenant resolved by the gate middleware (/api/*)

pub mod protected;
pub mod public;

use crate::error::ApiError;
use crate::services::Store;
use crate::state::AppState;

/// Public routes resolve their tenant from the property, so they need the
/// store directly rather than through the gate.
pub(crate) fn public_store(state: &AppState) -> Result<&Store, ApiError> {
    state
        .store
        .as_ref()
        .ok_or_else(|| ApiError::internal_server_error("No database client"))
}

// handlers/public/mod.rs - Anonymous endpoints
//
// Everything here is reachable without a session. Inputs are validated up
// front and the tenant comes from the property being asked about.

pub mod calendar;
pub mod guides;

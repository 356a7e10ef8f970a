//! API middleware.

mod auth;
mod doctor_gate;
mod rate_limit;

pub use auth::{admin_middleware, auth_middleware, require_admin, require_role, CurrentUser};
pub use doctor_gate::{doctor_gate_middleware, CurrentDoctor};
pub use rate_limit::{rate_limit_auth_middleware, rate_limit_middleware};

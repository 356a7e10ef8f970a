//! API layer - HTTP surface of the verification workflow
//!
//! - Handlers for auth, uploads, admin review and the doctor dashboard
//! - Middleware: JWT authentication, admin and doctor gates, rate limiting
//! - Extractors that report failures in the error envelope
//! - Route table and OpenAPI document

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;

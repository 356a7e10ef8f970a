//! HerCycle doctor verification service
//!
//! Backend for the HerCycle women's health platform's doctor onboarding:
//! doctors register with their credentials, admins approve or reject them,
//! and doctor-only resources stay closed until the credentials are approved.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: NIC parsing, users, doctors and the verification state machine
//! - **services**: Application use cases and business logic
//! - **infra**: Database, Redis rate limiting and document storage
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Provision an administrator
//! cargo run -- admin create --nic 198512345678 --email admin@hercycle.lk \
//!     --name "Site Admin" --password change-me-now
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Nic, Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::{Cache, RateLimiter};

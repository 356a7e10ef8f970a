//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Redis (request rate limiting)
//! - Local document storage for license uploads
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use cache::{Cache, RateLimiter};
pub use db::{Database, Migrator};
pub use repositories::{
    DoctorRepository, NotificationRepository, UserRepository, VerificationRepository,
};
pub use storage::{DocumentStorage, LocalDiskStorage};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockDoctorRepository, MockNotificationRepository, MockUserRepository,
    MockVerificationRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockDocumentStorage;

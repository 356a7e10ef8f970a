//! Repository layer - Data access abstraction
//!
//! Each repository has a trait (mocked in tests), a store bound to the
//! connection pool, and a `query` module of functions generic over
//! `ConnectionTrait` that the transaction-scoped repositories reuse.

mod doctor_repository;
pub(crate) mod entities;
mod notification_repository;
mod user_repository;
mod verification_repository;

pub(crate) use doctor_repository::query as doctor_query;
pub(crate) use notification_repository::query as notification_query;
pub(crate) use user_repository::query as user_query;
pub(crate) use verification_repository::query as verification_query;

pub use doctor_repository::{DoctorRepository, DoctorStore};
pub use notification_repository::{NotificationRepository, NotificationStore};
pub use user_repository::{UserRepository, UserStore};
pub use verification_repository::{VerificationRepository, VerificationStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use doctor_repository::MockDoctorRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::MockNotificationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use verification_repository::MockVerificationRepository;

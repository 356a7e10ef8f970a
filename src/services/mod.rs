//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure through the Unit
//! of Work. Handlers only see the service traits.

mod auth_service;
pub mod container;
mod doctor_service;
mod upload_service;
mod user_service;
mod verification_service;

#[cfg(test)]
pub(crate) mod testing;

pub use container::{ServiceContainer, Services};

pub use auth_service::{
    AuthService, Authenticator, Claims, DoctorApplication, RegisteredUser, Registration,
    TokenResponse,
};
pub use doctor_service::{DoctorDirectory, DoctorService};
pub use upload_service::{LicenseUpload, LicenseUploader, UploadService};
pub use user_service::{UserManager, UserService};
pub use verification_service::{VerificationReviewer, VerificationService};

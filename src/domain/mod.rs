//! Domain layer - Core business entities and logic
//!
//! Entities and value objects independent of storage and transport:
//! identities, NIC parsing, doctor profiles, notifications and the
//! verification state machine.

pub mod doctor;
pub mod nic;
pub mod notification;
pub mod password;
pub mod user;
pub mod verification;

pub use doctor::{Doctor, DoctorProfileUpdate};
pub use nic::{Gender, Nic};
pub use notification::{NewNotification, Notification};
pub use password::Password;
pub use user::{AccountStatus, NewUser, User, UserResponse, UserRole};
pub use verification::{
    AnyVerification, Applicant, Application, Pending, RejectionReason, Review, ReviewOutcome,
    StatusFilter, Verification, VerificationListItem, VerificationRecord, VerificationStatus,
};

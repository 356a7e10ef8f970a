//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod doctor;
pub mod doctor_verification;
pub mod notification;
pub mod user;

pub use doctor::{Entity as DoctorEntity, Model as DoctorModel};
pub use doctor_verification::{Entity as VerificationEntity, Model as VerificationModel};
pub use notification::{Entity as NotificationEntity, Model as NotificationModel};
pub use user::{Entity as UserEntity, Model as UserModel};

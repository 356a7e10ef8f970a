//! Configuration: environment-driven settings plus fixed constants
//! (roles, statuses, rate limits, upload limits).

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;

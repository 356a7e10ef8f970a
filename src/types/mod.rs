//! Shared types used across endpoints.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use response::{ApiResponse, Created};

//! Type definitions shared by the HTTP surfaces
//!
//! - `pagination` - Pagination for list endpoints
//! - `response` - Health checks and acknowledgement bodies

pub mod pagination;
pub mod response;

pub use pagination::{paginate_vec, PaginatedResponse, Pagination};
pub use response::{HealthResponse, HealthStatus, MessageResponse};

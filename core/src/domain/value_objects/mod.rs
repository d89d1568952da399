//! Value objects representing immutable domain concepts.

pub mod actor;
pub mod analytics;
pub mod auth_response;
pub mod listing_query;
pub mod registration;
pub mod report_query;
pub mod user_summary;

// Re-export commonly used types
pub use actor::Actor;
pub use analytics::{Dashboard, ListingStatusCounts, ReportStatusCounts};
pub use auth_response::{AuthResponse, UserProfile};
pub use listing_query::{ListingFilter, ListingInput, ListingPatch, ListingSort};
pub use registration::RegisterInput;
pub use report_query::ReportFilter;
pub use user_summary::UserSummary;

//! Repository interfaces and in-memory implementations.
//!
//! The MySQL implementations live in `eh_infra`. The in-memory ones back the
//! unit tests here and the HTTP tests of `eh_api`.

pub mod like;
pub mod listing;
pub mod photo;
pub mod report;
pub mod session;
pub mod user;
pub mod user_token;

pub use like::{InMemoryLikeRepository, LikeRepository};
pub use listing::{InMemoryListingRepository, ListingRepository};
pub use photo::{InMemoryPhotoRepository, PhotoRepository};
pub use report::{InMemoryReportRepository, ReportRepository};
pub use session::{InMemorySessionRepository, SessionRepository};
pub use user::{InMemoryUserRepository, UserRepository};
pub use user_token::{InMemoryUserTokenRepository, UserTokenRepository};

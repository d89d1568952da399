//! Business services containing domain logic and use cases.

pub mod analytics;
pub mod auth;
pub mod email;
pub mod listing;
pub mod moderation;
pub mod password;
pub mod photo;
pub mod report;
pub mod token;
pub mod user_directory;

// Re-export commonly used types
pub use analytics::{AnalyticsService, DEFAULT_TOP_LIKED};
pub use auth::{AuthService, CleanupResult, LoginInput};
pub use email::{EmailMessage, EmailSender, InMemoryEmailSender};
pub use listing::ListingService;
pub use moderation::{AllowAllModerator, ContentModerator, ModerationRequest, ModerationVerdict};
pub use password::{PasswordHasher, PasswordPolicy};
pub use photo::{InMemoryPhotoStorage, PhotoContent, PhotoService, PhotoStorage, PhotoUpload};
pub use report::{ReportService, SubmitReport};
pub use token::{generate_opaque_token, hash_token, AccessTokenValidator, TokenService};
pub use user_directory::{InMemoryUserDirectory, UserDirectory};

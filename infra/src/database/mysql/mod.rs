//! MySQL repository implementations

mod columns;

pub mod like_repository_impl;
pub mod listing_repository_impl;
pub mod photo_repository_impl;
pub mod report_repository_impl;
pub mod session_repository_impl;
pub mod user_repository_impl;
pub mod user_token_repository_impl;

pub use like_repository_impl::MySqlLikeRepository;
pub use listing_repository_impl::MySqlListingRepository;
pub use photo_repository_impl::MySqlPhotoRepository;
pub use report_repository_impl::MySqlReportRepository;
pub use session_repository_impl::MySqlSessionRepository;
pub use user_repository_impl::MySqlUserRepository;
pub use user_token_repository_impl::MySqlUserTokenRepository;

//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management
//! - Repository implementations for both services
//! - Embedded migrations, one set per service database

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

use sqlx::migrate::Migrator;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    MySqlLikeRepository, MySqlListingRepository, MySqlPhotoRepository, MySqlReportRepository,
    MySqlSessionRepository, MySqlUserRepository, MySqlUserTokenRepository,
};

/// Schema of the authorization database: users, sessions and e-mail tokens
pub static AUTH_MIGRATOR: Migrator = sqlx::migrate!("./migrations/auth");

/// Schema of the listing database: listings, photos, likes and reports
pub static LISTING_MIGRATOR: Migrator = sqlx::migrate!("./migrations/listing");

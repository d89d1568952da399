//! Request and response bodies of the REST routes

pub mod auth;
pub mod photos;
pub mod users;

pub use auth::*;
pub use photos::*;
pub use users::*;

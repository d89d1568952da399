//! # EstateHub API
//!
//! HTTP layer of both services: the authorization REST API and the listing
//! service (GraphQL plus the photo upload/download routes). The binaries in
//! `src/bin` wire MySQL, GridFS and SMTP into the app factories from [`app`].

pub mod app;
pub mod dto;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::{create_auth_app, create_listing_app};
pub use state::{AuthState, ListingState};

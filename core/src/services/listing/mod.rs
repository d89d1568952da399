//! Listing lifecycle, search and likes

mod service;


pub use service::ListingService;

//! Listing reports and their moderation workflow

mod service;


pub use service::{ReportService, SubmitReport};

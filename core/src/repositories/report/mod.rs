#[path = "trait.rs"]
mod repository_trait;
pub mod memory;

pub use memory::InMemoryReportRepository;
pub use repository_trait::ReportRepository;

#[path = "trait.rs"]
mod repository_trait;
pub mod memory;

pub use memory::InMemoryListingRepository;
pub use repository_trait::ListingRepository;

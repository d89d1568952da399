#[path = "trait.rs"]
mod repository_trait;
pub mod memory;

pub use memory::InMemoryPhotoRepository;
pub use repository_trait::PhotoRepository;

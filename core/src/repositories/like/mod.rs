#[path = "trait.rs"]
mod repository_trait;
pub mod memory;

pub use memory::InMemoryLikeRepository;
pub use repository_trait::LikeRepository;

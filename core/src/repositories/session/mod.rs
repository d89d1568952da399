#[path = "trait.rs"]
mod repository_trait;
pub mod memory;

pub use memory::InMemorySessionRepository;
pub use repository_trait::SessionRepository;

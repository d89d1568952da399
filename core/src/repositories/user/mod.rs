#[path = "trait.rs"]
mod repository_trait;
pub mod memory;

pub use memory::InMemoryUserRepository;
pub use repository_trait::UserRepository;

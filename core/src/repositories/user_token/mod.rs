#[path = "trait.rs"]
mod repository_trait;
pub mod memory;

pub use memory::InMemoryUserTokenRepository;
pub use repository_trait::UserTokenRepository;

//! Listing photos: bytes in a blob store, metadata in the repository

mod service;
mod storage;


pub use service::{PhotoContent, PhotoService, PhotoUpload};
pub use storage::{InMemoryPhotoStorage, PhotoStorage};

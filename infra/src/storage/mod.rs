//! Listing photo bytes kept in a MongoDB GridFS bucket

mod gridfs;

pub use gridfs::GridFsPhotoStorage;

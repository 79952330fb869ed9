//! Production implementations of the launcher's collaborator ports

pub mod storage;

pub use storage::HttpStorageUploader;

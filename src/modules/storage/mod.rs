//! Storage module for file management
//!
//! Provides the blob storage abstraction for uploaded packages and thumbnails,
//! backed by the local filesystem.

mod local_storage;

pub use local_storage::{LocalStorage, Storage};

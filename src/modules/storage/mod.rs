//! Storage module for object management
//!
//! Defines the `ObjectStore` capability the gateway consumes and its
//! implementations: an S3-compatible client and an in-process store.

mod error;
mod memory;
mod object_store;
mod s3_client;

pub use error::StorageError;
pub use memory::MemoryObjectStore;
pub use object_store::ObjectStore;
pub use s3_client::S3ObjectStore;

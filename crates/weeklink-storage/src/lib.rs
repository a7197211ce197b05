//! [`KeyValueStore`](weeklink_core::KeyValueStore) backends.

pub mod file;
pub mod memory;
pub mod redis;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use redis::RedisStore;
pub use weeklink_core::{KeyValueStore, StorageError};

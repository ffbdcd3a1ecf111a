//! Storage layer standing in for browser local storage
//!
//! - `KeyValueStore`: injected get/set/remove abstraction
//! - `MemoryStore`: in-memory backend with an optional quota (tests, ephemeral servers)
//! - `FileStore`: one JSON file per key, durable across restarts
//! - `LocalStorage`: typed accessors over the fixed buckets

pub mod file;
pub mod kv;
pub mod local;

pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use local::{Bucket, LocalStorage};

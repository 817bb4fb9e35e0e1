// On-device key-value storage backed by SQLite.
// Holds small JSON snapshots (favorites) that have to survive restarts.

pub mod kv;

pub use kv::{KvStore, StorageError};

#![forbid(unsafe_code)]

pub mod repository;
pub mod score_store;
pub mod sqlite;

pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
pub use score_store::ScoreStore;

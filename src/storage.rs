//! Local key-value storage and the track key sets persisted in it.

mod collections;
mod store;

pub use collections::{DOWNLOADED_KEY, FAVORITES_KEY, TrackCollections};
pub use store::{FileStore, KeyValueStore, MemoryStore};

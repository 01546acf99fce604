use std::collections::BTreeSet;

use log::warn;

use super::store::KeyValueStore;

pub const FAVORITES_KEY: &str = "favorites";
pub const DOWNLOADED_KEY: &str = "downloaded";

/// The favorites and downloaded track key sets.
///
/// Both sets are read from the store once, when built, and written back in
/// full after every change. Storage failures are logged; the in-memory sets
/// stay authoritative.
pub struct TrackCollections {
    store: Box<dyn KeyValueStore>,
    favorites: BTreeSet<String>,
    downloaded: BTreeSet<String>,
}

impl TrackCollections {
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let favorites = read_set(store.as_ref(), FAVORITES_KEY);
        let downloaded = read_set(store.as_ref(), DOWNLOADED_KEY);
        Self {
            store,
            favorites,
            downloaded,
        }
    }

    pub fn favorites(&self) -> &BTreeSet<String> {
        &self.favorites
    }

    pub fn is_favorite(&self, key: &str) -> bool {
        self.favorites.contains(key)
    }

    pub fn add_favorite(&mut self, key: &str) -> bool {
        let changed = self.favorites.insert(key.to_string());
        if changed {
            write_set(self.store.as_mut(), FAVORITES_KEY, &self.favorites);
        }
        changed
    }

    pub fn remove_favorite(&mut self, key: &str) -> bool {
        let changed = self.favorites.remove(key);
        if changed {
            write_set(self.store.as_mut(), FAVORITES_KEY, &self.favorites);
        }
        changed
    }

    /// Flip membership of `key`; returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, key: &str) -> bool {
        if self.is_favorite(key) {
            self.remove_favorite(key);
            false
        } else {
            self.add_favorite(key);
            true
        }
    }

    pub fn downloaded(&self) -> &BTreeSet<String> {
        &self.downloaded
    }

    pub fn is_downloaded(&self, key: &str) -> bool {
        self.downloaded.contains(key)
    }

    pub fn mark_downloaded(&mut self, key: &str) -> bool {
        let changed = self.downloaded.insert(key.to_string());
        if changed {
            write_set(self.store.as_mut(), DOWNLOADED_KEY, &self.downloaded);
        }
        changed
    }

    pub fn unmark_downloaded(&mut self, key: &str) -> bool {
        let changed = self.downloaded.remove(key);
        if changed {
            write_set(self.store.as_mut(), DOWNLOADED_KEY, &self.downloaded);
        }
        changed
    }

    /// Give the store back, e.g. to rebuild the collections from it.
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }
}

fn read_set(store: &dyn KeyValueStore, key: &str) -> BTreeSet<String> {
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return BTreeSet::new(),
        Err(e) => {
            warn!("could not read {key} from storage, starting empty: {e}");
            return BTreeSet::new();
        }
    };

    match serde_json::from_str::<Vec<String>>(&text) {
        Ok(keys) => keys.into_iter().collect(),
        Err(e) => {
            warn!("stored {key} is not a JSON array of keys, starting empty: {e}");
            BTreeSet::new()
        }
    }
}

fn write_set(store: &mut dyn KeyValueStore, key: &str, set: &BTreeSet<String>) {
    let json = match serde_json::to_string(set) {
        Ok(json) => json,
        Err(e) => {
            warn!("could not serialize {key}: {e}");
            return;
        }
    };
    if let Err(e) = store.set(key, &json) {
        warn!("could not persist {key}: {e}");
    }
}

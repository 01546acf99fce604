use log::warn;

use crate::audio::AudioEngine;
use crate::config;
use crate::library::{Catalog, CatalogSource, HttpCatalog, fetch_catalog};
use crate::player::PlaybackController;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, TrackCollections};

/// Open the configured state file, or an in-memory store when no path can be resolved.
pub fn open_store(settings: &config::Settings) -> Box<dyn KeyValueStore> {
    match settings.storage_path() {
        Some(path) => Box::new(FileStore::new(path)),
        None => {
            warn!("no storage path (HOME unset); favorites will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

pub fn open_catalog(settings: &config::Settings) -> crate::Result<HttpCatalog> {
    Ok(HttpCatalog::new(
        &settings.catalog.base_url,
        settings.request_timeout(),
    )?)
}

/// Fetch the catalog; on failure start with an empty one so `refresh` can retry.
pub fn load_catalog(source: &dyn CatalogSource, extension: &str) -> Option<Catalog> {
    match fetch_catalog(source, extension) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!("could not fetch catalog: {e}");
            None
        }
    }
}

pub fn build_controller(
    settings: &config::Settings,
    engine: Box<dyn AudioEngine>,
) -> PlaybackController {
    let collections = TrackCollections::load(open_store(settings));
    PlaybackController::new(engine, collections, settings.catalog.base_url.clone())
}

pub fn apply_playback_defaults(controller: &mut PlaybackController, settings: &config::Settings) {
    controller.set_repeat_mode(settings.playback.repeat.into());
    if settings.playback.shuffle && !controller.is_shuffled() {
        controller.toggle_shuffle();
    }
}

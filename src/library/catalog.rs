//! Client side of the remote catalog service.
//!
//! The service lists album and artist folders, and the files inside each
//! one. Only entries with the configured audio extension become tracks.

use std::time::Duration;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::CatalogError;

use super::model::{Catalog, Track, join_url};

/// One listing row as served by the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub last_modified: Option<String>,
}

/// Read side of the catalog service.
pub trait CatalogSource {
    fn albums(&self) -> Result<Vec<CatalogEntry>, CatalogError>;
    fn artists(&self) -> Result<Vec<CatalogEntry>, CatalogError>;
    fn album_tracks(&self, album: &str) -> Result<Vec<CatalogEntry>, CatalogError>;
    fn artist_tracks(&self, artist: &str) -> Result<Vec<CatalogEntry>, CatalogError>;
}

/// [`CatalogSource`] speaking JSON over HTTP.
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Endpoint URL for `segments`, each percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> String {
        join_url(&self.base_url, segments)
    }

    fn get_list(&self, segments: &[&str]) -> Result<Vec<CatalogEntry>, CatalogError> {
        let url = self.endpoint(segments);
        let response = self.client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<CatalogEntry>>()
            .map_err(|e| CatalogError::Decode {
                url,
                reason: e.to_string(),
            })
    }
}

impl CatalogSource for HttpCatalog {
    fn albums(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.get_list(&["albums"])
    }

    fn artists(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.get_list(&["artists"])
    }

    fn album_tracks(&self, album: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.get_list(&["albums", album])
    }

    fn artist_tracks(&self, artist: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.get_list(&["artists", artist])
    }
}

/// Whether `name` ends in `.{extension}`, ignoring case.
pub(crate) fn has_audio_extension(name: &str, extension: &str) -> bool {
    let ext = extension.trim().trim_start_matches('.');
    if ext.is_empty() {
        return false;
    }
    name.rsplit_once('.')
        .map(|(_, e)| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

fn collect_group(
    groups: Vec<CatalogEntry>,
    extension: &str,
    list: impl Fn(&str) -> Result<Vec<CatalogEntry>, CatalogError>,
    out: &mut Vec<Track>,
) {
    for group in groups {
        let entries = match list(&group.name) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("skipping {}: {e}", group.key);
                continue;
            }
        };

        for entry in entries {
            if !has_audio_extension(&entry.name, extension) {
                continue;
            }
            match Track::from_key(&entry.key, &entry.name) {
                Some(track) => out.push(track),
                None => debug!("ignoring catalog key without album/artist prefix: {}", entry.key),
            }
        }
    }
}

/// Fetch the whole catalog from `source`.
///
/// Failing to list albums or artists fails the fetch. A single album or
/// artist whose track list cannot be fetched is skipped.
pub fn fetch_catalog(source: &dyn CatalogSource, extension: &str) -> Result<Catalog, CatalogError> {
    let albums = source.albums()?;
    let artists = source.artists()?;

    let mut tracks = Vec::new();
    collect_group(albums, extension, |name| source.album_tracks(name), &mut tracks);
    collect_group(artists, extension, |name| source.artist_tracks(name), &mut tracks);

    let catalog = Catalog::new(tracks);
    info!("catalog loaded: {} tracks", catalog.len());
    Ok(catalog)
}

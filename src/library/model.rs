use std::collections::HashSet;
use std::fmt;

use log::debug;
use reqwest::Url;

/// Where a track was listed in the catalog, tagged once at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrackOrigin {
    /// Listed under `album/{name}/`.
    Album(String),
    /// Listed under `artist/{name}/`.
    Artist(String),
}

impl TrackOrigin {
    /// Derive the origin from a key such as `album/Hymns of Praise/01.mp3`.
    fn from_key(key: &str) -> Option<Self> {
        let mut parts = key.splitn(3, '/');
        let prefix = parts.next()?;
        let group = parts.next().filter(|g| !g.trim().is_empty())?;
        // The file part must exist; a bare folder key is not a track.
        parts.next().filter(|f| !f.is_empty())?;

        match prefix {
            "album" => Some(TrackOrigin::Album(group.to_string())),
            "artist" => Some(TrackOrigin::Artist(group.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for TrackOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackOrigin::Album(name) => write!(f, "album {name}"),
            TrackOrigin::Artist(name) => write!(f, "artist {name}"),
        }
    }
}

/// One playable audio item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Stable identifier, also the path of the audio relative to the catalog base URL.
    pub key: String,
    pub name: String,
    pub origin: TrackOrigin,
}

impl Track {
    /// Build a track from a catalog key and the listed file name.
    ///
    /// Returns `None` when the key is neither `album/…` nor `artist/…`.
    pub fn from_key(key: &str, file_name: &str) -> Option<Self> {
        let origin = TrackOrigin::from_key(key)?;
        let name = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.trim().is_empty() => stem.trim().to_string(),
            _ => file_name.trim().to_string(),
        };
        Some(Self {
            key: key.to_string(),
            name,
            origin,
        })
    }

    pub fn album(&self) -> Option<&str> {
        match &self.origin {
            TrackOrigin::Album(name) => Some(name),
            TrackOrigin::Artist(_) => None,
        }
    }

    pub fn artist(&self) -> Option<&str> {
        match &self.origin {
            TrackOrigin::Artist(name) => Some(name),
            TrackOrigin::Album(_) => None,
        }
    }

    /// Audio URI of this track under `base_url`. Each key segment is
    /// percent-encoded.
    pub fn uri(&self, base_url: &str) -> String {
        let segments: Vec<&str> = self.key.split('/').collect();
        join_url(base_url, &segments)
    }
}

/// Append `segments` to the path of `base`, percent-encoding each one.
///
/// A base that is not an absolute URL is treated as a local directory and
/// joined verbatim.
pub(crate) fn join_url(base: &str, segments: &[&str]) -> String {
    if let Ok(mut url) = Url::parse(base) {
        let pushed = match url.path_segments_mut() {
            Ok(mut path) => {
                path.pop_if_empty().extend(segments);
                true
            }
            Err(()) => false,
        };
        if pushed {
            return url.to_string();
        }
    }
    format!("{}/{}", base.trim_end_matches('/'), segments.join("/"))
}

/// An immutable snapshot of the catalog. Keys are unique.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog, keeping the first track for each key.
    pub fn new(tracks: Vec<Track>) -> Self {
        let mut seen: HashSet<String> = HashSet::with_capacity(tracks.len());
        let tracks = tracks
            .into_iter()
            .filter(|t| {
                let fresh = seen.insert(t.key.clone());
                if !fresh {
                    debug!("dropping duplicate catalog key {}", t.key);
                }
                fresh
            })
            .collect();
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.key == key)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

use std::fmt;

use super::model::{Catalog, Track};

/// Selects the subset of the catalog that forms the natural ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Tracks whose key lives under `album/{name}/`.
    Album(String),
    /// Tracks whose key lives under `artist/{name}/`.
    Artist(String),
    /// Tracks whose name fuzzily matches the query.
    Search(String),
}

impl Filter {
    pub fn matches(&self, track: &Track) -> bool {
        match self {
            Filter::Album(name) => track.key.starts_with(&format!("album/{name}/")),
            Filter::Artist(name) => track.key.starts_with(&format!("artist/{name}/")),
            Filter::Search(query) => fuzzy_match_positions(&track.name, query.trim()).is_some(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Album(name) => write!(f, "album \"{name}\""),
            Filter::Artist(name) => write!(f, "artist \"{name}\""),
            Filter::Search(query) => write!(f, "search \"{query}\""),
        }
    }
}

/// Catalog indices matching `filter`, in catalog order. `None` selects everything.
pub fn natural_order(catalog: &Catalog, filter: Option<&Filter>) -> Vec<usize> {
    catalog
        .tracks()
        .iter()
        .enumerate()
        .filter(|(_, t)| filter.is_none_or(|f| f.matches(t)))
        .map(|(i, _)| i)
        .collect()
}

/// Case-insensitive subsequence match of `query` against `name`.
///
/// Returns the char positions in `name` that matched, or `None`.
pub fn fuzzy_match_positions(name: &str, query: &str) -> Option<Vec<usize>> {
    let fold = |c: char| c.to_lowercase().next().unwrap_or(c);
    let mut chars = name.chars().map(fold).enumerate();

    query
        .chars()
        .map(fold)
        .map(|q| chars.find(|&(_, c)| c == q).map(|(i, _)| i))
        .collect()
}

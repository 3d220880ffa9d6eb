//! Listing payload → gallery items
//!
//! Pure and synchronous. A malformed entry is logged and skipped; the rest of
//! the listing still comes through in server order.

use thiserror::Error;
use tracing::warn;

use crate::api::types::{MediaContainer, MetadataEntry};
use crate::models::{ContentInfo, MovieInfo, SeasonInfo, WatchState};

/// Turns server-relative asset paths into absolute URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    base_url: String,
    token: Option<String>,
}

impl AssetResolver {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Resolve a poster path such as `/library/metadata/1/thumb/1700000000`
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        if let Some(ref token) = self.token {
            let sep = if url.contains('?') { '&' } else { '?' };
            url.push(sep);
            url.push_str("X-Plex-Token=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }
}

/// Why a listing entry was skipped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedEntry {
    #[error("entry {index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("entry {index} has type `{found}`, expected `{expected}`")]
    UnexpectedType {
        index: usize,
        found: String,
        expected: &'static str,
    },
}

/// Build movie records from a section listing
pub fn movies(container: &MediaContainer, assets: &AssetResolver) -> Vec<ContentInfo> {
    collect(container, |index, entry| movie_entry(index, entry, assets))
}

/// Build season records from a show's children listing
pub fn seasons(container: &MediaContainer, assets: &AssetResolver) -> Vec<ContentInfo> {
    collect(container, |index, entry| {
        season_entry(index, entry, container.parent_title.as_deref(), assets)
    })
}

fn collect<F>(container: &MediaContainer, build: F) -> Vec<ContentInfo>
where
    F: Fn(usize, &MetadataEntry) -> Result<ContentInfo, MalformedEntry>,
{
    container
        .metadata
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match build(index, entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("skipping listing entry: {}", e);
                None
            }
        })
        .collect()
}

/// Fields every poster needs: id, title, poster path
fn required<'a>(
    index: usize,
    entry: &'a MetadataEntry,
) -> Result<(&'a str, &'a str, &'a str), MalformedEntry> {
    let present = |value: &'a Option<String>, field: &'static str| {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(MalformedEntry::MissingField { index, field })
    };
    Ok((
        present(&entry.rating_key, "ratingKey")?,
        present(&entry.title, "title")?,
        present(&entry.thumb, "thumb")?,
    ))
}

fn expect_kind(
    index: usize,
    entry: &MetadataEntry,
    expected: &'static str,
) -> Result<(), MalformedEntry> {
    match entry.kind.as_deref() {
        Some(found) if found != expected => Err(MalformedEntry::UnexpectedType {
            index,
            found: found.to_string(),
            expected,
        }),
        _ => Ok(()),
    }
}

fn movie_entry(
    index: usize,
    entry: &MetadataEntry,
    assets: &AssetResolver,
) -> Result<ContentInfo, MalformedEntry> {
    expect_kind(index, entry, "movie")?;
    let (id, title, thumb) = required(index, entry)?;

    let watch_state = if entry.view_count.unwrap_or(0) > 0 {
        WatchState::Watched
    } else {
        match (entry.view_offset, entry.duration) {
            (Some(offset), Some(duration)) => WatchState::from_counts(offset, duration),
            _ => WatchState::Unwatched,
        }
    };

    Ok(ContentInfo::movie(
        id,
        title,
        assets.resolve(thumb),
        watch_state,
        MovieInfo {
            year: entry.year,
            summary: entry.summary.clone().unwrap_or_default(),
            studio: entry.studio.clone(),
            content_rating: entry.content_rating.clone(),
            duration_ms: entry.duration,
        },
    ))
}

fn season_entry(
    index: usize,
    entry: &MetadataEntry,
    show_title: Option<&str>,
    assets: &AssetResolver,
) -> Result<ContentInfo, MalformedEntry> {
    expect_kind(index, entry, "season")?;
    let (id, title, thumb) = required(index, entry)?;

    Ok(ContentInfo::season(
        id,
        title,
        assets.resolve(thumb),
        SeasonInfo {
            parent_title: entry
                .parent_title
                .clone()
                .or_else(|| show_title.map(str::to_string)),
            index: entry.index,
            total_episodes: entry.leaf_count.unwrap_or(0),
            watched_episodes: entry.viewed_leaf_count.unwrap_or(0),
        },
    ))
}

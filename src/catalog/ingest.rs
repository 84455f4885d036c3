// Catalog ingestion.
//
// Input is newline-delimited JSON, one album record per line. A malformed
// line is dropped with a warning and the catalog is built from whatever
// remains; only a catalog with zero valid records is a fatal load error.

use std::collections::HashSet;

use log::warn;
use serde::Deserialize;

use crate::error::CoreError;

use super::{Album, AlbumCatalog};

#[derive(Debug, Deserialize)]
struct RawAlbumRecord {
    id: String,
    #[serde(rename = "globalId")]
    global_id: String,
    #[serde(rename = "artistId")]
    artist_id: String,
    artist: String,
    release: String,
    #[serde(default)]
    position: u32,
    #[serde(rename = "releaseDate")]
    release_date: String,
    #[serde(rename = "releaseType", default)]
    release_type: String,
    #[serde(rename = "primaryGenres", default)]
    primary_genres: Vec<String>,
    #[serde(rename = "secondaryGenres", default)]
    secondary_genres: Vec<String>,
    #[serde(default)]
    descriptors: Vec<String>,
    #[serde(rename = "avgRating")]
    avg_rating: f64,
    #[serde(rename = "ratingCount")]
    rating_count: u32,
    #[serde(rename = "reviewCount")]
    review_count: u32,
}

impl RawAlbumRecord {
    fn into_album(self) -> Result<Album, String> {
        if self.id.is_empty() {
            return Err("empty album id".to_string());
        }
        if self.artist_id.is_empty() {
            return Err("empty artist id".to_string());
        }
        if self.release.is_empty() {
            return Err("empty release title".to_string());
        }
        if !self.avg_rating.is_finite() {
            return Err(format!("non-finite avgRating {}", self.avg_rating));
        }

        Ok(Album {
            id: self.id,
            global_id: self.global_id,
            artist_id: self.artist_id,
            artist_name: self.artist,
            title: self.release,
            position: self.position,
            release_date: self.release_date,
            release_type: self.release_type,
            primary_genres: self.primary_genres,
            secondary_genres: self.secondary_genres,
            descriptors: self.descriptors,
            avg_rating: self.avg_rating,
            rating_count: self.rating_count,
            review_count: self.review_count,
        })
    }
}

/// Parse an NDJSON album dump into a catalog. Never fails on individual
/// records; fails only when nothing valid remains.
pub fn parse_catalog(input: &str) -> Result<AlbumCatalog, CoreError> {
    let mut albums: Vec<Album> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut dropped = 0usize;

    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = match serde_json::from_str::<RawAlbumRecord>(line) {
            Ok(record) => record,
            Err(error) => {
                warn!("dropping album record on line {}: {error}", index + 1);
                dropped += 1;
                continue;
            }
        };

        match record.into_album() {
            Ok(album) => {
                if !seen.insert(album.id.clone()) {
                    warn!(
                        "dropping album record on line {}: duplicate id '{}'",
                        index + 1,
                        album.id
                    );
                    dropped += 1;
                    continue;
                }
                albums.push(album);
            }
            Err(message) => {
                warn!("dropping album record on line {}: {message}", index + 1);
                dropped += 1;
            }
        }
    }

    if albums.is_empty() {
        return Err(CoreError::EmptyCatalog);
    }

    Ok(AlbumCatalog::from_albums(albums, dropped))
}

// In-memory album catalog.
//
// Built once from the NDJSON dump, then read-only. Reverse indices (artist,
// genre, descriptor) are built in the same pass and rebuilt wholesale on
// reload; there is no incremental mutation. All selectors are pure reads
// that return `Option`/empty on a miss.

use std::collections::HashMap;

mod ingest;

pub use ingest::parse_catalog;

#[derive(Clone, Debug, PartialEq)]
pub struct Album {
    pub id: String,
    pub global_id: String,
    pub artist_id: String,
    pub artist_name: String,
    pub title: String,
    /// Position within the artist's discography dump.
    pub position: u32,
    /// ISO-8601 date, kept verbatim.
    pub release_date: String,
    pub release_type: String,
    pub primary_genres: Vec<String>,
    pub secondary_genres: Vec<String>,
    pub descriptors: Vec<String>,
    pub avg_rating: f64,
    pub rating_count: u32,
    pub review_count: u32,
}

#[derive(Clone, Debug, Default)]
pub struct AlbumCatalog {
    albums: HashMap<String, Album>,
    order: Vec<String>,
    by_artist: HashMap<String, Vec<String>>,
    by_genre: HashMap<String, Vec<String>>,
    by_descriptor: HashMap<String, Vec<String>>,
    dropped_records: usize,
}

impl AlbumCatalog {
    pub fn from_albums(albums: Vec<Album>, dropped_records: usize) -> Self {
        let mut catalog = AlbumCatalog {
            dropped_records,
            ..AlbumCatalog::default()
        };

        for album in albums {
            let id = album.id.clone();
            catalog.by_artist.entry(album.artist_id.clone()).or_default().push(id.clone());
            for genre in album.primary_genres.iter().chain(&album.secondary_genres) {
                catalog.by_genre.entry(genre.clone()).or_default().push(id.clone());
            }
            for descriptor in &album.descriptors {
                catalog.by_descriptor.entry(descriptor.clone()).or_default().push(id.clone());
            }
            catalog.order.push(id.clone());
            catalog.albums.insert(id, album);
        }

        catalog
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    /// Records dropped during ingestion of this catalog.
    pub fn dropped_records(&self) -> usize {
        self.dropped_records
    }

    pub fn album(&self, id: &str) -> Option<&Album> {
        self.albums.get(id)
    }

    /// All albums in catalog order.
    pub fn albums(&self) -> impl Iterator<Item = &Album> {
        self.order.iter().filter_map(|id| self.albums.get(id))
    }

    pub fn albums_by_artist(&self, artist_id: &str) -> &[String] {
        self.by_artist.get(artist_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn albums_by_genre(&self, genre: &str) -> &[String] {
        self.by_genre.get(genre).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn albums_by_descriptor(&self, descriptor: &str) -> &[String] {
        self.by_descriptor.get(descriptor).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn artist_count(&self) -> usize {
        self.by_artist.len()
    }

    /// Display name for an artist, from any of their albums.
    pub fn artist_name(&self, artist_id: &str) -> Option<&str> {
        self.albums_by_artist(artist_id)
            .first()
            .and_then(|id| self.albums.get(id))
            .map(|album| album.artist_name.as_str())
    }

    /// Genres ranked by album count, ties broken by name.
    pub fn top_genres(&self, limit: usize) -> Vec<(String, usize)> {
        let mut genres: Vec<(String, usize)> = self
            .by_genre
            .iter()
            .map(|(genre, ids)| (genre.clone(), ids.len()))
            .collect();
        genres.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        genres.truncate(limit);
        genres
    }
}

#[cfg(test)]
pub(crate) fn test_album(id: &str, artist_id: &str) -> Album {
    Album {
        id: id.to_string(),
        global_id: format!("g-{id}"),
        artist_id: artist_id.to_string(),
        artist_name: format!("Artist {artist_id}"),
        title: format!("Title {id}"),
        position: 0,
        release_date: "2020-01-01".to_string(),
        release_type: "album".to_string(),
        primary_genres: Vec::new(),
        secondary_genres: Vec::new(),
        descriptors: Vec::new(),
        avg_rating: 3.5,
        rating_count: 100,
        review_count: 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> AlbumCatalog {
        let mut a1 = test_album("a1", "art1");
        a1.primary_genres = vec!["rock".to_string()];
        a1.descriptors = vec!["melodic".to_string()];
        let mut a2 = test_album("a2", "art1");
        a2.secondary_genres = vec!["rock".to_string(), "jazz".to_string()];
        let mut b1 = test_album("b1", "art2");
        b1.primary_genres = vec!["jazz".to_string()];

        AlbumCatalog::from_albums(vec![a1, a2, b1], 1)
    }

    #[test]
    fn selectors_hit_and_miss() {
        let catalog = fixture();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.dropped_records(), 1);
        assert_eq!(catalog.album("a1").unwrap().title, "Title a1");
        assert!(catalog.album("nope").is_none());
        assert_eq!(catalog.albums_by_artist("art1"), ["a1".to_string(), "a2".to_string()]);
        assert!(catalog.albums_by_artist("ghost").is_empty());
        assert_eq!(catalog.albums_by_descriptor("melodic"), ["a1".to_string()]);
    }

    #[test]
    fn genre_index_spans_primary_and_secondary() {
        let catalog = fixture();
        assert_eq!(catalog.albums_by_genre("rock"), ["a1".to_string(), "a2".to_string()]);
        assert_eq!(catalog.albums_by_genre("jazz"), ["a2".to_string(), "b1".to_string()]);
    }

    #[test]
    fn top_genres_rank_by_count_then_name() {
        let catalog = fixture();
        let top = catalog.top_genres(10);
        // Both genres cover two albums; "jazz" wins the name tie.
        assert_eq!(
            top,
            vec![("jazz".to_string(), 2), ("rock".to_string(), 2)]
        );
    }
}

// Recommendation scoring.
//
// Candidates are scored against a seed album on four genre-overlap buckets
// (primary/primary, primary/secondary, secondary/primary,
// secondary/secondary), descriptor overlap, and rating delta. The full
// contribution breakdown rides along with each result so the frontend can
// explain the edge.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Album, AlbumCatalog};

mod tags;

pub use tags::derive_match_tags;

/// Per-factor weights. The genre cross buckets (primary/secondary in either
/// direction) share one weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub genre_pp: f64,
    pub genre_ps: f64,
    pub genre_ss: f64,
    pub descriptor: f64,
    pub rating: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            genre_pp: 1.0,
            genre_ps: 0.6,
            genre_ss: 0.3,
            descriptor: 1.0,
            rating: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendOptions {
    /// Drop candidates with zero shared genres across all four buckets.
    pub require_genre_overlap: bool,
    /// Drop candidates by the seed's artist.
    pub exclude_same_artist: bool,
    /// Keep only each artist's highest-ranked album in the output.
    pub exclude_doubled_artist: bool,
}

/// Structured contribution breakdown for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreReason {
    pub shared_primary_primary: Vec<String>,
    pub shared_primary_secondary: Vec<String>,
    pub shared_secondary_primary: Vec<String>,
    pub shared_secondary_secondary: Vec<String>,
    pub shared_descriptors: Vec<String>,
    pub genre_score: f64,
    pub descriptor_score: f64,
    pub rating_score: f64,
}

impl ScoreReason {
    pub fn total(&self) -> f64 {
        self.genre_score + self.descriptor_score + self.rating_score
    }

    pub fn any_genre_overlap(&self) -> bool {
        !self.shared_primary_primary.is_empty()
            || !self.shared_primary_secondary.is_empty()
            || !self.shared_secondary_primary.is_empty()
            || !self.shared_secondary_secondary.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Recommendation {
    pub album: Album,
    pub score: f64,
    pub reason: ScoreReason,
    /// Up to four display tags naming the strongest matches.
    pub tags: Vec<String>,
}

/// Shared labels, in `left` order, deduplicated.
fn shared_labels(left: &[String], right: &[String]) -> Vec<String> {
    let lookup: HashSet<&str> = right.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    left.iter()
        .filter(|label| lookup.contains(label.as_str()) && seen.insert(label.as_str()))
        .cloned()
        .collect()
}

/// Score one candidate against the seed.
pub fn score_candidate(seed: &Album, candidate: &Album, weights: &ScoreWeights) -> ScoreReason {
    let pp = shared_labels(&seed.primary_genres, &candidate.primary_genres);
    let ps = shared_labels(&seed.primary_genres, &candidate.secondary_genres);
    let sp = shared_labels(&seed.secondary_genres, &candidate.primary_genres);
    let ss = shared_labels(&seed.secondary_genres, &candidate.secondary_genres);
    let descriptors = shared_labels(&seed.descriptors, &candidate.descriptors);

    let genre_score = pp.len() as f64 * weights.genre_pp
        + ps.len() as f64 * weights.genre_ps
        + sp.len() as f64 * weights.genre_ps
        + ss.len() as f64 * weights.genre_ss;
    let descriptor_score = descriptors.len() as f64 * weights.descriptor;
    let rating_score = (candidate.avg_rating - seed.avg_rating).max(0.0) * weights.rating;

    ScoreReason {
        shared_primary_primary: pp,
        shared_primary_secondary: ps,
        shared_secondary_primary: sp,
        shared_secondary_secondary: ss,
        shared_descriptors: descriptors,
        genre_score,
        descriptor_score,
        rating_score,
    }
}

/// Rank the catalog against a seed album. The pool is every album except
/// the seed and `excluded_ids`; output is at most `top_x` entries.
pub fn recommend(
    catalog: &AlbumCatalog,
    seed: &Album,
    top_x: usize,
    excluded_ids: &HashSet<String>,
    weights: &ScoreWeights,
    options: &RecommendOptions,
) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = catalog
        .albums()
        .filter(|candidate| candidate.id != seed.id && !excluded_ids.contains(&candidate.id))
        .filter(|candidate| !(options.exclude_same_artist && candidate.artist_id == seed.artist_id))
        .filter_map(|candidate| {
            let reason = score_candidate(seed, candidate, weights);
            if options.require_genre_overlap && !reason.any_genre_overlap() {
                return None;
            }
            let tags = derive_match_tags(seed, candidate, &reason);
            Some(Recommendation {
                album: candidate.clone(),
                score: reason.total(),
                reason,
                tags,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.album.avg_rating.total_cmp(&a.album.avg_rating))
            .then_with(|| b.album.rating_count.cmp(&a.album.rating_count))
    });

    if options.exclude_doubled_artist {
        let mut seen_artists: HashSet<String> = HashSet::new();
        ranked.retain(|entry| seen_artists.insert(entry.album.artist_id.clone()));
    }

    ranked.truncate(top_x);
    ranked
}

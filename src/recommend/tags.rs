// Match-tag derivation.
//
// Each recommendation edge carries up to four short labels naming why the
// candidate matched. Genre matches come first, strongest bucket first; the
// remaining slots are filled with shared descriptors in an order seeded by
// the (seed, candidate) id pair so a given edge always shows the same tags.

use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::catalog::Album;

use super::ScoreReason;

const MAX_TAGS: usize = 4;
const MAX_GENRE_TAGS: usize = 2;

fn pair_hash(seed_id: &str, candidate_id: &str, label: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed_id.hash(&mut hasher);
    candidate_id.hash(&mut hasher);
    label.hash(&mut hasher);
    hasher.finish()
}

/// Up to four tags: at most two genre matches in priority order
/// primary/primary > cross buckets > secondary/secondary, then shared
/// descriptors in seeded-hash order.
pub fn derive_match_tags(seed: &Album, candidate: &Album, reason: &ScoreReason) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(MAX_TAGS);
    let mut seen: HashSet<&str> = HashSet::new();

    let genre_buckets = [
        &reason.shared_primary_primary,
        &reason.shared_primary_secondary,
        &reason.shared_secondary_primary,
        &reason.shared_secondary_secondary,
    ];
    'genres: for bucket in genre_buckets {
        for label in bucket {
            if tags.len() == MAX_GENRE_TAGS {
                break 'genres;
            }
            if seen.insert(label.as_str()) {
                tags.push(label.clone());
            }
        }
    }

    let mut descriptors: Vec<&String> = reason.shared_descriptors.iter().collect();
    descriptors.sort_by_key(|label| pair_hash(&seed.id, &candidate.id, label));
    for label in descriptors {
        if tags.len() == MAX_TAGS {
            break;
        }
        if seen.insert(label.as_str()) {
            tags.push(label.clone());
        }
    }

    tags
}

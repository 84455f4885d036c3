// Per-view node builders.
//
// Each builder is a pure (catalog, inputs) -> ViewGraph function; the
// matching position builder turns the graph plus measured dimensions into
// coordinates. Grid views (home, search, discography) pack cards in
// insertion order; the flowchart lays out its recommendation tree.

use std::collections::HashMap;

use log::warn;

use crate::catalog::AlbumCatalog;
use crate::error::CoreError;
use crate::layout::{GridParams, PointF, SizeF, TreeParams, layout_tree, pack_grid};
use crate::recommend::Recommendation;

use super::{NodeContext, NodeId, ViewGraph, ViewKind};

pub fn album_node_id(album_id: &str) -> NodeId {
    format!("album:{album_id}")
}

pub fn artist_node_id(artist_id: &str) -> NodeId {
    format!("artist:{artist_id}")
}

pub fn genre_node_id(name: &str) -> NodeId {
    format!("genre:{name}")
}

/// Home: app title, search affordance, and cards for the most-covered
/// genres in the catalog.
pub fn build_home_nodes(catalog: &AlbumCatalog, genre_limit: usize) -> ViewGraph {
    let mut graph = ViewGraph::new(ViewKind::Home);
    graph.push("app-title".to_string(), NodeContext::AppTitle);
    graph.push(
        "button:search".to_string(),
        NodeContext::IconButton { action: "open-search".to_string() },
    );
    graph.push(
        "section:genres".to_string(),
        NodeContext::SectionTitle { text: "Browse genres".to_string() },
    );
    for (name, _count) in catalog.top_genres(genre_limit) {
        graph.push(genre_node_id(&name), NodeContext::Genre { name });
    }
    graph
}

/// Search: cards for caller-provided result ids (the fuzzy matcher lives
/// outside the core). Unknown ids are skipped. Distinct artists of the
/// results get their own cards ahead of the albums.
pub fn build_search_nodes(catalog: &AlbumCatalog, result_ids: &[String]) -> ViewGraph {
    let mut graph = ViewGraph::new(ViewKind::Search);
    graph.push(
        "section:results".to_string(),
        NodeContext::SectionTitle { text: "Results".to_string() },
    );

    let albums: Vec<_> = result_ids
        .iter()
        .filter_map(|id| catalog.album(id))
        .collect();

    let mut seen_artists: Vec<&str> = Vec::new();
    for album in &albums {
        if seen_artists.contains(&album.artist_id.as_str()) {
            continue;
        }
        seen_artists.push(&album.artist_id);
        graph.push(
            artist_node_id(&album.artist_id),
            NodeContext::Artist {
                artist_id: album.artist_id.clone(),
                name: album.artist_name.clone(),
            },
        );
    }
    for album in &albums {
        graph.push(
            album_node_id(&album.id),
            NodeContext::Album { album_id: album.id.clone() },
        );
    }
    graph
}

/// Discography: the artist card, then one section per release type in
/// order of first appearance, albums ordered by discography position.
pub fn build_discography_nodes(catalog: &AlbumCatalog, artist_id: &str) -> ViewGraph {
    let mut graph = ViewGraph::new(ViewKind::Discography);

    let Some(name) = catalog.artist_name(artist_id) else {
        return graph;
    };
    graph.push(
        artist_node_id(artist_id),
        NodeContext::Artist {
            artist_id: artist_id.to_string(),
            name: name.to_string(),
        },
    );

    let mut albums: Vec<_> = catalog
        .albums_by_artist(artist_id)
        .iter()
        .filter_map(|id| catalog.album(id))
        .collect();
    albums.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));

    let mut sections: Vec<&str> = Vec::new();
    for album in &albums {
        if !sections.contains(&album.release_type.as_str()) {
            sections.push(&album.release_type);
        }
    }

    for section in sections {
        graph.push(
            format!("section:{section}"),
            NodeContext::SectionTitle { text: section.to_string() },
        );
        for album in albums.iter().filter(|a| a.release_type == section) {
            graph.push(
                album_node_id(&album.id),
                NodeContext::Album { album_id: album.id.clone() },
            );
        }
    }
    graph
}

/// Flowchart: the seed album as root. Returns an empty graph when the seed
/// is unknown (lookup misses never throw).
pub fn build_flowchart_root(catalog: &AlbumCatalog, seed_id: &str) -> ViewGraph {
    let mut graph = ViewGraph::new(ViewKind::Flowchart);
    match catalog.album(seed_id) {
        Some(album) => {
            graph.set_root(
                album_node_id(&album.id),
                NodeContext::Album { album_id: album.id.clone() },
            );
        }
        None => warn!("flowchart seed album '{seed_id}' is not in the catalog"),
    }
    graph
}

/// Append recommendation children under `parent`. Only valid on the
/// flowchart view; a missing parent logs a warning and is a no-op.
pub fn expand_with_recommendations(
    graph: &mut ViewGraph,
    parent: &str,
    recommendations: &[Recommendation],
) -> Result<(), CoreError> {
    if graph.kind() != ViewKind::Flowchart {
        return Err(CoreError::WrongView {
            expected: ViewKind::Flowchart,
            actual: graph.kind(),
        });
    }
    if !graph.contains(parent) {
        warn!("expansion parent '{parent}' is not in the flowchart, ignoring");
        return Ok(());
    }

    for recommendation in recommendations {
        let album_id = &recommendation.album.id;
        graph.add_child(
            parent,
            album_node_id(album_id),
            NodeContext::Album { album_id: album_id.clone() },
        );
    }
    Ok(())
}

/// Position every node of the view. Pure; tolerates a dimensions map that
/// is a strict superset of the graph's ids, and fails fast on a missing
/// one.
pub fn build_node_positions(
    graph: &ViewGraph,
    dimensions: &HashMap<NodeId, SizeF>,
    grid_params: &GridParams,
    tree_params: &TreeParams,
) -> HashMap<NodeId, PointF> {
    match graph.kind() {
        ViewKind::Flowchart => layout_tree(graph, dimensions, tree_params),
        ViewKind::Home | ViewKind::Search | ViewKind::Discography => {
            let items: Vec<(NodeId, SizeF)> = graph
                .ordered_ids()
                .iter()
                .map(|id| {
                    let size = dimensions.get(id).copied().unwrap_or_else(|| {
                        panic!("grid layout: no measured dimensions for node '{id}'")
                    });
                    (id.clone(), size)
                })
                .collect();
            pack_grid(&items, grid_params).positions
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Album, test_album};
    use crate::recommend::{RecommendOptions, ScoreWeights, recommend};
    use std::collections::HashSet;

    fn catalog() -> AlbumCatalog {
        let mut albums: Vec<Album> = Vec::new();

        let mut lp = test_album("lp1", "art1");
        lp.position = 2;
        lp.primary_genres = vec!["rock".to_string()];
        let mut ep = test_album("ep1", "art1");
        ep.position = 3;
        ep.release_type = "ep".to_string();
        let mut first = test_album("lp0", "art1");
        first.position = 1;
        first.primary_genres = vec!["rock".to_string()];
        let mut other = test_album("lp2", "art2");
        other.primary_genres = vec!["rock".to_string(), "jazz".to_string()];

        albums.extend([lp, ep, first, other]);
        AlbumCatalog::from_albums(albums, 0)
    }

    #[test]
    fn home_view_lists_chrome_then_genres() {
        let graph = build_home_nodes(&catalog(), 2);
        let ids = graph.ordered_ids();

        assert_eq!(ids[0], "app-title");
        assert_eq!(ids[1], "button:search");
        assert_eq!(ids[2], "section:genres");
        // rock covers 3 albums, jazz 1.
        assert_eq!(ids[3], "genre:rock");
        assert_eq!(ids[4], "genre:jazz");
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn search_view_skips_unknown_ids_and_dedupes_artists() {
        let graph = build_search_nodes(
            &catalog(),
            &["lp1".to_string(), "lp0".to_string(), "missing".to_string()],
        );
        let ids = graph.ordered_ids();

        assert_eq!(
            ids,
            [
                "section:results".to_string(),
                "artist:art1".to_string(),
                "album:lp1".to_string(),
                "album:lp0".to_string(),
            ]
        );
    }

    #[test]
    fn discography_groups_by_release_type_in_position_order() {
        let graph = build_discography_nodes(&catalog(), "art1");
        let ids = graph.ordered_ids();

        assert_eq!(
            ids,
            [
                "artist:art1".to_string(),
                "section:album".to_string(),
                "album:lp0".to_string(),
                "album:lp1".to_string(),
                "section:ep".to_string(),
                "album:ep1".to_string(),
            ]
        );
    }

    #[test]
    fn discography_of_unknown_artist_is_empty() {
        let graph = build_discography_nodes(&catalog(), "ghost");
        assert!(graph.is_empty());
    }

    #[test]
    fn flowchart_expand_requires_the_flowchart_view() {
        let catalog = catalog();
        let recs = recommend(
            &catalog,
            catalog.album("lp1").unwrap(),
            2,
            &HashSet::new(),
            &ScoreWeights::default(),
            &RecommendOptions::default(),
        );

        let mut home = build_home_nodes(&catalog, 1);
        let err = expand_with_recommendations(&mut home, "app-title", &recs);
        assert!(matches!(err, Err(CoreError::WrongView { .. })));

        let mut chart = build_flowchart_root(&catalog, "lp1");
        expand_with_recommendations(&mut chart, "album:lp1", &recs).unwrap();
        assert_eq!(chart.children("album:lp1").len(), 2);

        // Missing parent: warn + no-op, not an error.
        let before = chart.len();
        expand_with_recommendations(&mut chart, "album:ghost", &recs).unwrap();
        assert_eq!(chart.len(), before);
    }

    #[test]
    fn unknown_seed_builds_an_empty_flowchart() {
        let graph = build_flowchart_root(&catalog(), "ghost");
        assert!(graph.is_empty());
        assert!(graph.root().is_none());
    }

    #[test]
    fn position_builder_dispatches_per_view_and_tolerates_extra_dims() {
        let catalog = catalog();
        let graph = build_search_nodes(&catalog, &["lp1".to_string()]);

        let mut dims: HashMap<NodeId, SizeF> = graph
            .ordered_ids()
            .iter()
            .map(|id| (id.clone(), SizeF { w: 100.0, h: 40.0 }))
            .collect();
        dims.insert("unrelated".to_string(), SizeF { w: 1.0, h: 1.0 });

        let positions = build_node_positions(
            &graph,
            &dims,
            &GridParams::default(),
            &TreeParams::default(),
        );
        assert_eq!(positions.len(), graph.len());
        assert!(!positions.contains_key("unrelated"));
    }

    #[test]
    #[should_panic(expected = "no measured dimensions")]
    fn grid_position_builder_fails_fast_on_missing_dims() {
        let catalog = catalog();
        let graph = build_search_nodes(&catalog, &["lp1".to_string()]);
        build_node_positions(
            &graph,
            &HashMap::new(),
            &GridParams::default(),
            &TreeParams::default(),
        );
    }
}

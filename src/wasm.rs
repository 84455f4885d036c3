//! WASM bindings.
//!
//! Every entry point is string-in/string-out JSON and stateless: the
//! catalog dump and any prior state ride in with the request, the result
//! rides out, and nothing is retained between calls. Failures come back as
//! a payload with an `error` field, mirrored to the console.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::to_string;
use wasm_bindgen::prelude::*;

use crate::catalog::{AlbumCatalog, parse_catalog};
use crate::error::CoreError;
use crate::layout::{GridParams, PointF, RectF, SizeF, TreeParams};
use crate::output::{
    CatalogSummaryOutput, ErrorInfo, FitOutput, GenreCount, LayoutOutput, RecommendOutput,
    RecommendationOutput, ViewOutput, VisibleOutput,
};
use crate::positioning::PositionedNode;
use crate::recommend::{RecommendOptions, ScoreWeights, recommend};
use crate::view::{
    NodeContext, ViewGraph, ViewKind, album_node_id, build_discography_nodes, build_flowchart_root,
    build_home_nodes, build_node_positions, build_search_nodes, expand_with_recommendations,
};
use crate::viewport::{
    CameraTransform, ViewportConfig, compute_fit_transform, compute_min_scale,
    compute_translate_extent,
};
use crate::windowing::{Anchor, Windowing, content_bounds, node_aabb, viewport_rect};

#[wasm_bindgen]
extern "C" {
    pub fn alert(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

fn default_genre_limit() -> usize {
    12
}

fn default_top_x() -> usize {
    5
}

fn default_buffer_fraction() -> f64 {
    0.15
}

fn default_anchor() -> Anchor {
    Anchor::TopLeft
}

#[derive(Debug, Deserialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
enum ViewRequest {
    Home {
        #[serde(default = "default_genre_limit")]
        genre_limit: usize,
    },
    Search {
        result_ids: Vec<String>,
    },
    Discography {
        artist_id: String,
    },
    Flowchart {
        seed_id: String,
        /// Album ids to expand with recommendations, in order.
        #[serde(default)]
        expand: Vec<String>,
        #[serde(default = "default_top_x")]
        top_x: usize,
        #[serde(default)]
        weights: ScoreWeights,
        #[serde(default)]
        options: RecommendOptions,
    },
}

#[derive(Debug, Deserialize)]
struct RecommendRequest {
    seed_id: String,
    #[serde(default = "default_top_x")]
    top_x: usize,
    #[serde(default)]
    excluded_ids: Vec<String>,
    #[serde(default)]
    weights: ScoreWeights,
    #[serde(default)]
    options: RecommendOptions,
}

#[derive(Debug, Deserialize)]
struct FitRequest {
    bounds: RectF,
    canvas: SizeF,
    #[serde(default)]
    config: ViewportConfig,
}

#[derive(Debug, Deserialize)]
struct VisibleNodeRequest {
    id: String,
    position: PointF,
    size: SizeF,
}

#[derive(Debug, Deserialize)]
struct VisibleRequest {
    nodes: Vec<VisibleNodeRequest>,
    #[serde(default)]
    links: Vec<crate::view::Link>,
    #[serde(default = "default_anchor")]
    anchor: Anchor,
    camera: CameraTransform,
    canvas: SizeF,
    #[serde(default = "default_buffer_fraction")]
    buffer_fraction: f64,
    /// Visible sets from the previous call; reappearance is diffed against
    /// these since no state survives between calls.
    #[serde(default)]
    previous_nodes: Vec<String>,
    #[serde(default)]
    previous_links: Vec<String>,
}

fn album_ids_in(graph: &ViewGraph) -> HashSet<String> {
    graph
        .iter()
        .filter_map(|node| match &node.context {
            NodeContext::Album { album_id } => Some(album_id.clone()),
            _ => None,
        })
        .collect()
}

fn build_requested_view(
    catalog: &AlbumCatalog,
    request: ViewRequest,
) -> Result<ViewGraph, CoreError> {
    match request {
        ViewRequest::Home { genre_limit } => Ok(build_home_nodes(catalog, genre_limit)),
        ViewRequest::Search { result_ids } => Ok(build_search_nodes(catalog, &result_ids)),
        ViewRequest::Discography { artist_id } => Ok(build_discography_nodes(catalog, &artist_id)),
        ViewRequest::Flowchart { seed_id, expand, top_x, weights, options } => {
            let mut graph = build_flowchart_root(catalog, &seed_id);
            for album_id in &expand {
                let Some(album) = catalog.album(album_id) else {
                    console_error(&format!("Expansion album '{}' not found", album_id));
                    continue;
                };
                // Albums already on the chart never reappear as children.
                let excluded = album_ids_in(&graph);
                let recommendations =
                    recommend(catalog, album, top_x, &excluded, &weights, &options);
                expand_with_recommendations(&mut graph, &album_node_id(album_id), &recommendations)?;
            }
            Ok(graph)
        }
    }
}

#[wasm_bindgen]
pub fn catalog_summary(input: &str, genre_limit: usize) -> String {
    let catalog = match parse_catalog(input) {
        Ok(catalog) => catalog,
        Err(e) => {
            console_error(&format!("Error parsing catalog: {}", e));
            return to_string(&CatalogSummaryOutput::failure(&e)).unwrap();
        }
    };

    let top_genres = catalog
        .top_genres(genre_limit)
        .into_iter()
        .map(|(name, count)| GenreCount { name, count })
        .collect();
    let output = CatalogSummaryOutput {
        album_count: catalog.len(),
        artist_count: catalog.artist_count(),
        dropped_records: catalog.dropped_records(),
        top_genres,
        error: None,
    };
    to_string(&output).unwrap()
}

#[wasm_bindgen]
pub fn recommend_albums(catalog_input: &str, request: &str) -> String {
    let request: RecommendRequest = match serde_json::from_str(request) {
        Ok(request) => request,
        Err(e) => {
            console_error(&format!("Error parsing recommend request: {}", e));
            return to_string(&RecommendOutput::failure("", ErrorInfo::message(e.to_string())))
                .unwrap();
        }
    };
    let catalog = match parse_catalog(catalog_input) {
        Ok(catalog) => catalog,
        Err(e) => {
            console_error(&format!("Error parsing catalog: {}", e));
            return to_string(&RecommendOutput::failure(&request.seed_id, (&e).into())).unwrap();
        }
    };
    let Some(seed) = catalog.album(&request.seed_id) else {
        let message = format!("Seed album '{}' is not in the catalog", request.seed_id);
        console_error(&message);
        return to_string(&RecommendOutput::failure(&request.seed_id, ErrorInfo::message(message)))
            .unwrap();
    };

    let excluded: HashSet<String> = request.excluded_ids.iter().cloned().collect();
    let recommendations = recommend(
        &catalog,
        seed,
        request.top_x,
        &excluded,
        &request.weights,
        &request.options,
    );
    let output = RecommendOutput {
        seed_id: request.seed_id,
        recommendations: recommendations.iter().map(RecommendationOutput::from).collect(),
        error: None,
    };
    to_string(&output).unwrap()
}

#[wasm_bindgen]
pub fn build_view(catalog_input: &str, request: &str) -> String {
    let request: ViewRequest = match serde_json::from_str(request) {
        Ok(request) => request,
        Err(e) => {
            console_error(&format!("Error parsing view request: {}", e));
            return to_string(&ViewOutput::failure(ErrorInfo::message(e.to_string()))).unwrap();
        }
    };
    let catalog = match parse_catalog(catalog_input) {
        Ok(catalog) => catalog,
        Err(e) => {
            console_error(&format!("Error parsing catalog: {}", e));
            return to_string(&ViewOutput::failure((&e).into())).unwrap();
        }
    };
    let graph = match build_requested_view(&catalog, request) {
        Ok(graph) => graph,
        Err(e) => {
            console_error(&format!("Error building view: {}", e));
            return to_string(&ViewOutput::failure((&e).into())).unwrap();
        }
    };

    let output = ViewOutput {
        kind: Some(graph.kind()),
        nodes: graph.iter().cloned().collect(),
        links: graph.links(),
        root: graph.root().map(str::to_string),
        error: None,
    };
    to_string(&output).unwrap()
}

#[wasm_bindgen]
pub fn layout_view(catalog_input: &str, request: &str, dimensions: &str) -> String {
    let request: ViewRequest = match serde_json::from_str(request) {
        Ok(request) => request,
        Err(e) => {
            console_error(&format!("Error parsing view request: {}", e));
            return to_string(&LayoutOutput::failure(ErrorInfo::message(e.to_string()))).unwrap();
        }
    };
    let dimensions: HashMap<String, SizeF> = match serde_json::from_str(dimensions) {
        Ok(dimensions) => dimensions,
        Err(e) => {
            console_error(&format!("Error parsing dimensions: {}", e));
            return to_string(&LayoutOutput::failure(ErrorInfo::message(e.to_string()))).unwrap();
        }
    };
    let catalog = match parse_catalog(catalog_input) {
        Ok(catalog) => catalog,
        Err(e) => {
            console_error(&format!("Error parsing catalog: {}", e));
            return to_string(&LayoutOutput::failure((&e).into())).unwrap();
        }
    };
    let graph = match build_requested_view(&catalog, request) {
        Ok(graph) => graph,
        Err(e) => {
            console_error(&format!("Error building view: {}", e));
            return to_string(&LayoutOutput::failure((&e).into())).unwrap();
        }
    };

    let positions = build_node_positions(
        &graph,
        &dimensions,
        &GridParams::default(),
        &TreeParams::default(),
    );
    let anchor = match graph.kind() {
        ViewKind::Flowchart => Anchor::TopCenter,
        _ => Anchor::TopLeft,
    };
    let nodes: Vec<PositionedNode> = graph
        .ordered_ids()
        .iter()
        .map(|id| PositionedNode {
            id: id.clone(),
            position: positions[id],
            size: dimensions[id],
        })
        .collect();
    let boxes: HashMap<String, RectF> = nodes
        .iter()
        .map(|node| (node.id.clone(), node_aabb(node.position, node.size, anchor)))
        .collect();

    let output = LayoutOutput {
        kind: Some(graph.kind()),
        nodes,
        links: graph.links(),
        bounds: content_bounds(&boxes),
        error: None,
    };
    to_string(&output).unwrap()
}

#[wasm_bindgen]
pub fn fit_transform(request: &str) -> String {
    let request: FitRequest = match serde_json::from_str(request) {
        Ok(request) => request,
        Err(e) => {
            console_error(&format!("Error parsing fit request: {}", e));
            let output = FitOutput {
                camera: CameraTransform::identity(),
                min_scale: 0.0,
                translate_extent: RectF::default(),
                error: Some(ErrorInfo::message(e.to_string())),
            };
            return to_string(&output).unwrap();
        }
    };

    let output = FitOutput {
        camera: compute_fit_transform(&request.bounds, request.canvas, &request.config),
        min_scale: compute_min_scale(&request.bounds, request.canvas, &request.config),
        translate_extent: compute_translate_extent(&request.bounds, request.canvas, &request.config),
        error: None,
    };
    to_string(&output).unwrap()
}

#[wasm_bindgen]
pub fn visible_set(request: &str) -> String {
    let request: VisibleRequest = match serde_json::from_str(request) {
        Ok(request) => request,
        Err(e) => {
            console_error(&format!("Error parsing visibility request: {}", e));
            let output = VisibleOutput {
                visible: Default::default(),
                error: Some(ErrorInfo::message(e.to_string())),
            };
            return to_string(&output).unwrap();
        }
    };

    let boxes: HashMap<String, RectF> = request
        .nodes
        .iter()
        .map(|node| (node.id.clone(), node_aabb(node.position, node.size, request.anchor)))
        .collect();
    let viewport = viewport_rect(request.camera, request.canvas);

    let mut windowing = Windowing::with_previous(
        request.previous_nodes.into_iter().collect(),
        request.previous_links.into_iter().collect(),
    );
    let visible = windowing.compute(&boxes, &request.links, viewport, request.buffer_fraction);

    let output = VisibleOutput { visible, error: None };
    to_string(&output).unwrap()
}

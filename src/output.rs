//! Output types for the frontend.
//!
//! These structs are serialized to JSON at the wasm boundary and consumed
//! by the rendering layer as-is.

use serde::Serialize;

use crate::error::CoreError;
use crate::layout::RectF;
use crate::positioning::PositionedNode;
use crate::recommend::{Recommendation, ScoreReason};
use crate::view::{Link, NodeDef, ViewKind};
use crate::viewport::CameraTransform;
use crate::windowing::VisibleSet;

/// Error payload; `line` is set for ingestion errors with a source line.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl From<&CoreError> for ErrorInfo {
    fn from(error: &CoreError) -> Self {
        let line = match error {
            CoreError::InvalidRecord { line, .. } => Some(*line),
            _ => None,
        };
        Self { message: error.to_string(), line }
    }
}

impl ErrorInfo {
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), line: None }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreCount {
    pub name: String,
    pub count: usize,
}

/// Catalog ingestion summary.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummaryOutput {
    pub album_count: usize,
    pub artist_count: usize,
    pub dropped_records: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_genres: Vec<GenreCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl CatalogSummaryOutput {
    pub fn failure(error: &CoreError) -> Self {
        Self {
            album_count: 0,
            artist_count: 0,
            dropped_records: 0,
            top_genres: vec![],
            error: Some(error.into()),
        }
    }
}

/// One ranked recommendation edge.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationOutput {
    pub album_id: String,
    pub artist_id: String,
    pub artist_name: String,
    pub title: String,
    pub score: f64,
    pub tags: Vec<String>,
    pub reason: ScoreReason,
}

impl From<&Recommendation> for RecommendationOutput {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            album_id: recommendation.album.id.clone(),
            artist_id: recommendation.album.artist_id.clone(),
            artist_name: recommendation.album.artist_name.clone(),
            title: recommendation.album.title.clone(),
            score: recommendation.score,
            tags: recommendation.tags.clone(),
            reason: recommendation.reason.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendOutput {
    pub seed_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<RecommendationOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl RecommendOutput {
    pub fn failure(seed_id: &str, error: ErrorInfo) -> Self {
        Self {
            seed_id: seed_id.to_string(),
            recommendations: vec![],
            error: Some(error),
        }
    }
}

/// A built view graph, pre-layout.
#[derive(Debug, Clone, Serialize)]
pub struct ViewOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ViewKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeDef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl ViewOutput {
    pub fn failure(error: ErrorInfo) -> Self {
        Self {
            kind: None,
            nodes: vec![],
            links: vec![],
            root: None,
            error: Some(error),
        }
    }
}

/// A fully positioned view.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ViewKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<PositionedNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<RectF>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl LayoutOutput {
    pub fn failure(error: ErrorInfo) -> Self {
        Self {
            kind: None,
            nodes: vec![],
            links: vec![],
            bounds: None,
            error: Some(error),
        }
    }
}

/// Camera fit result: the target transform plus the recomputed limits.
#[derive(Debug, Clone, Serialize)]
pub struct FitOutput {
    pub camera: CameraTransform,
    pub min_scale: f64,
    pub translate_extent: RectF,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibleOutput {
    pub visible: VisibleSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

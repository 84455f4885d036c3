// Layout primitives for the view builders.
//
// All coordinates live in one shared content space (f64, matching the JS
// side). Two layout families:
// - grid: row-wrapping packer for home / search / discography cards
// - tree: hierarchical flowchart layout with width propagation + centering
//
// Both are pure: (node ids, measured sizes, params) -> positions. Measured
// sizes come from the frontend's invisible shell pass; no layout runs for a
// node without dimensions.

use serde::{Deserialize, Serialize};

mod grid;
mod tree;

pub use grid::{GridLayout, pack_grid};
pub use tree::layout_tree;

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeF {
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectF {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> PointF {
        PointF {
            x: self.x + self.w / 2.0,
            y: self.y + self.h / 2.0,
        }
    }

    pub fn overlaps(&self, other: &RectF) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn union(&self, other: &RectF) -> RectF {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        RectF { x: x0, y: y0, w: x1 - x0, h: y1 - y0 }
    }

    /// Expand by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> RectF {
        RectF {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + 2.0 * margin,
            h: self.h + 2.0 * margin,
        }
    }
}

/// Parameters for the row-wrapping grid packer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridParams {
    /// Items per row before wrapping.
    pub max_per_row: usize,
    /// Top-left corner of the first item.
    pub origin: PointF,
    /// Horizontal gap between items in a row.
    pub x_gap: f64,
    /// Vertical gap between rows.
    pub y_gap: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            max_per_row: 5,
            origin: PointF { x: 0.0, y: 0.0 },
            x_gap: 24.0,
            y_gap: 32.0,
        }
    }
}

/// Parameters for the flowchart tree layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParams {
    /// Horizontal margin between sibling subtrees.
    pub h_margin: f64,
    /// Vertical margin between depth rows.
    pub v_margin: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            h_margin: 48.0,
            v_margin: 96.0,
        }
    }
}

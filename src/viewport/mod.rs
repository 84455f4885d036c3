// Viewport math.
//
// The camera maps content coordinates to screen: screen = content * scale
// + translate. Everything here is pure; ZoomManager (zoom.rs) owns the
// stateful transition/token bookkeeping on top of these functions.

use serde::{Deserialize, Serialize};

use crate::layout::{RectF, SizeF};

mod zoom;

pub use zoom::{Debouncer, ZoomManager, ZoomStatus, ZoomToken, ZoomTransition};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl CameraTransform {
    pub fn identity() -> Self {
        Self { translate_x: 0.0, translate_y: 0.0, scale: 1.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Content padding applied around the positioned-node bounding box.
    pub padding: f64,
    /// Hard floor below which the fit scale never drops.
    pub global_min_scale: f64,
    /// Zoom ceiling.
    pub max_scale: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            padding: 80.0,
            global_min_scale: 0.1,
            max_scale: 2.5,
        }
    }
}

/// Scale at which the padded bounding box exactly fits the canvas; the zoom
/// floor. A padded box equal to the canvas gives 1.0.
pub fn compute_min_scale(bounds: &RectF, canvas: SizeF, cfg: &ViewportConfig) -> f64 {
    let padded = bounds.expanded(cfg.padding);
    if padded.w <= 0.0 || padded.h <= 0.0 || canvas.w <= 0.0 || canvas.h <= 0.0 {
        return cfg.global_min_scale;
    }
    let fit = (canvas.w / padded.w).min(canvas.h / padded.h);
    fit.clamp(cfg.global_min_scale, cfg.max_scale)
}

/// Pan boundary in content coordinates: the padded bounding box, expanded
/// symmetrically so that at max zoom the canvas never runs out of extent.
pub fn compute_translate_extent(bounds: &RectF, canvas: SizeF, cfg: &ViewportConfig) -> RectF {
    let padded = bounds.expanded(cfg.padding);
    let min_w = canvas.w / cfg.max_scale;
    let min_h = canvas.h / cfg.max_scale;

    let mut extent = padded;
    if extent.w < min_w {
        extent.x -= (min_w - extent.w) / 2.0;
        extent.w = min_w;
    }
    if extent.h < min_h {
        extent.y -= (min_h - extent.h) / 2.0;
        extent.h = min_h;
    }
    extent
}

/// Transform centering `bounds` in the canvas at the largest scale within
/// [global floor, ceiling] that fits the padded box.
pub fn compute_fit_transform(bounds: &RectF, canvas: SizeF, cfg: &ViewportConfig) -> CameraTransform {
    let scale = compute_min_scale(bounds, canvas, cfg);
    let center = bounds.center();
    CameraTransform {
        translate_x: canvas.w / 2.0 - scale * center.x,
        translate_y: canvas.h / 2.0 - scale * center.y,
        scale,
    }
}

/// Clamp a camera's translate so the canvas stays inside the pan boundary.
/// When the scaled extent is smaller than the canvas on an axis, the
/// content is centered on that axis instead.
pub fn clamp_to_extent(camera: CameraTransform, extent: &RectF, canvas: SizeF) -> CameraTransform {
    let clamp_axis = |canvas_len: f64, lo_edge: f64, hi_edge: f64, t: f64, s: f64| {
        let lo = canvas_len - hi_edge * s;
        let hi = -lo_edge * s;
        if lo > hi { (lo + hi) / 2.0 } else { t.clamp(lo, hi) }
    };

    CameraTransform {
        translate_x: clamp_axis(
            canvas.w,
            extent.x,
            extent.right(),
            camera.translate_x,
            camera.scale,
        ),
        translate_y: clamp_axis(
            canvas.h,
            extent.y,
            extent.bottom(),
            camera.translate_y,
            camera.scale,
        ),
        scale: camera.scale,
    }
}

// Zoom transition bookkeeping.
//
// Camera animations run in the frontend; the core only decides targets and
// arbitrates overlap. Every transition gets a monotonic token, and only the
// holder of the newest token may commit or cancel. Stale completions from
// an animation that was preempted mid-flight fall on the floor.
//
// No clock in here: resize debouncing takes caller-supplied timestamps so
// the whole thing stays deterministic under test.

use log::debug;
use serde::Serialize;

use crate::layout::{RectF, SizeF};
use crate::view::NodeId;

use super::{
    CameraTransform, ViewportConfig, clamp_to_extent, compute_fit_transform, compute_min_scale,
    compute_translate_extent,
};

pub type ZoomToken = u64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ZoomStatus {
    Idle,
    /// A fit-to-subset animation is in flight. `nodes` names the subset when
    /// the caller provided one, for the frontend to highlight.
    RezoomPending {
        nodes: Option<Vec<NodeId>>,
        token: ZoomToken,
    },
    /// A post-resize corrective animation is in flight.
    ResizePending { token: ZoomToken },
}

/// A transition handed to the frontend animation layer. The token must come
/// back with `complete_transition` or `interrupt_transition`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoomTransition {
    pub token: ZoomToken,
    pub target: CameraTransform,
}

/// Trailing-edge debounce over caller timestamps (milliseconds).
#[derive(Debug)]
pub struct Debouncer {
    quiet_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(quiet_ms: f64) -> Self {
        Self { quiet_ms, deadline: None }
    }

    /// (Re)arm: the deadline moves with every trigger.
    pub fn trigger(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.quiet_ms);
    }

    /// True exactly once, when polled at or past the deadline.
    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }
}

const RESIZE_QUIET_MS: f64 = 150.0;

#[derive(Debug)]
pub struct ZoomManager {
    cfg: ViewportConfig,
    canvas: SizeF,
    camera: CameraTransform,
    content_bounds: Option<RectF>,
    min_scale: f64,
    translate_extent: Option<RectF>,
    status: ZoomStatus,
    next_token: ZoomToken,
    resize_debounce: Debouncer,
}

impl ZoomManager {
    pub fn new(canvas: SizeF, cfg: ViewportConfig) -> Self {
        Self {
            min_scale: cfg.global_min_scale,
            cfg,
            canvas,
            camera: CameraTransform::identity(),
            content_bounds: None,
            translate_extent: None,
            status: ZoomStatus::Idle,
            next_token: 0,
            resize_debounce: Debouncer::new(RESIZE_QUIET_MS),
        }
    }

    pub fn camera(&self) -> CameraTransform {
        self.camera
    }

    pub fn status(&self) -> &ZoomStatus {
        &self.status
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn translate_extent(&self) -> Option<&RectF> {
        self.translate_extent.as_ref()
    }

    fn fresh_token(&mut self) -> ZoomToken {
        self.next_token += 1;
        self.next_token
    }

    fn pending_token(&self) -> Option<ZoomToken> {
        match self.status {
            ZoomStatus::Idle => None,
            ZoomStatus::RezoomPending { token, .. } | ZoomStatus::ResizePending { token } => {
                Some(token)
            }
        }
    }

    fn recompute_limits(&mut self) {
        if let Some(bounds) = &self.content_bounds {
            self.min_scale = compute_min_scale(bounds, self.canvas, &self.cfg);
            self.translate_extent = Some(compute_translate_extent(bounds, self.canvas, &self.cfg));
        } else {
            self.min_scale = self.cfg.global_min_scale;
            self.translate_extent = None;
        }
    }

    /// Refresh the zoom floor and pan boundary after the positioned-node
    /// bounding box changed.
    pub fn set_content_bounds(&mut self, bounds: RectF) {
        self.content_bounds = Some(bounds);
        self.recompute_limits();
    }

    /// Start a fit-to-bounds animation. Supersedes any in-flight transition;
    /// its token becomes stale immediately.
    pub fn begin_rezoom(&mut self, subset: RectF, nodes: Option<Vec<NodeId>>) -> ZoomTransition {
        let token = self.fresh_token();
        let mut target = compute_fit_transform(&subset, self.canvas, &self.cfg);

        // Fitting a subset may ask for a scale below the whole-content
        // floor; hold the floor and re-center at the clamped scale.
        if target.scale < self.min_scale {
            let center = subset.center();
            target.scale = self.min_scale;
            target.translate_x = self.canvas.w / 2.0 - target.scale * center.x;
            target.translate_y = self.canvas.h / 2.0 - target.scale * center.y;
        }
        if let Some(extent) = &self.translate_extent {
            target = clamp_to_extent(target, extent, self.canvas);
        }

        self.status = ZoomStatus::RezoomPending { nodes, token };
        ZoomTransition { token, target }
    }

    /// Commit the finished animation's camera. Stale tokens are ignored.
    pub fn complete_transition(&mut self, token: ZoomToken, camera: CameraTransform) -> bool {
        if self.pending_token() != Some(token) {
            debug!("ignoring stale zoom completion for token {token}");
            return false;
        }
        self.camera = camera;
        self.status = ZoomStatus::Idle;
        true
    }

    /// Cancel an in-flight animation (user grabbed the canvas mid-flight).
    /// The camera stays wherever the frontend left it via `update_camera`.
    pub fn interrupt_transition(&mut self, token: ZoomToken) -> bool {
        if self.pending_token() != Some(token) {
            return false;
        }
        self.status = ZoomStatus::Idle;
        true
    }

    /// Direct camera update from user pan/zoom, clamped to the limits.
    pub fn update_camera(&mut self, camera: CameraTransform) -> CameraTransform {
        let mut camera = camera;
        camera.scale = camera.scale.clamp(self.min_scale, self.cfg.max_scale);
        if let Some(extent) = &self.translate_extent {
            camera = clamp_to_extent(camera, extent, self.canvas);
        }
        self.camera = camera;
        camera
    }

    /// Record a canvas resize. Limits update immediately; any corrective
    /// animation waits for the resize stream to go quiet.
    pub fn note_resize(&mut self, canvas: SizeF, now_ms: f64) {
        self.canvas = canvas;
        self.recompute_limits();
        self.resize_debounce.trigger(now_ms);
    }

    /// Poll the resize debounce. Once the stream has been quiet long
    /// enough, returns a corrective transition if the current camera
    /// violates the recomputed limits, and nothing otherwise.
    pub fn poll_resize(&mut self, now_ms: f64) -> Option<ZoomTransition> {
        if !self.resize_debounce.fire(now_ms) {
            return None;
        }

        let mut corrected = self.camera;
        corrected.scale = corrected.scale.clamp(self.min_scale, self.cfg.max_scale);
        if let Some(extent) = &self.translate_extent {
            corrected = clamp_to_extent(corrected, extent, self.canvas);
        }
        if corrected == self.camera {
            return None;
        }

        let token = self.fresh_token();
        self.status = ZoomStatus::ResizePending { token };
        Some(ZoomTransition { token, target: corrected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ZoomManager {
        let mut manager = ZoomManager::new(
            SizeF { w: 1280.0, h: 800.0 },
            ViewportConfig::default(),
        );
        manager.set_content_bounds(RectF::new(0.0, 0.0, 2000.0, 2000.0));
        manager
    }

    #[test]
    fn rezoom_targets_the_subset_center() {
        let mut manager = manager();
        let subset = RectF::new(400.0, 400.0, 200.0, 200.0);
        let transition = manager.begin_rezoom(subset, None);

        let target = transition.target;
        let sx = 500.0 * target.scale + target.translate_x;
        let sy = 500.0 * target.scale + target.translate_y;
        assert!((sx - 640.0).abs() < 1e-9);
        assert!((sy - 400.0).abs() < 1e-9);
        assert!(matches!(manager.status(), ZoomStatus::RezoomPending { .. }));
    }

    #[test]
    fn completing_with_the_live_token_commits_the_camera() {
        let mut manager = manager();
        let transition = manager.begin_rezoom(RectF::new(0.0, 0.0, 500.0, 500.0), None);

        assert!(manager.complete_transition(transition.token, transition.target));
        assert_eq!(manager.camera(), transition.target);
        assert_eq!(manager.status(), &ZoomStatus::Idle);
    }

    #[test]
    fn a_newer_rezoom_makes_the_older_token_stale() {
        let mut manager = manager();
        let first = manager.begin_rezoom(RectF::new(0.0, 0.0, 500.0, 500.0), None);
        let second = manager.begin_rezoom(
            RectF::new(1000.0, 1000.0, 500.0, 500.0),
            Some(vec!["album:x".to_string()]),
        );

        let before = manager.camera();
        assert!(!manager.complete_transition(first.token, first.target));
        assert_eq!(manager.camera(), before);

        assert!(manager.complete_transition(second.token, second.target));
        assert_eq!(manager.camera(), second.target);
    }

    #[test]
    fn interrupt_cancels_only_the_live_transition() {
        let mut manager = manager();
        let first = manager.begin_rezoom(RectF::new(0.0, 0.0, 500.0, 500.0), None);
        assert!(manager.interrupt_transition(first.token));
        assert_eq!(manager.status(), &ZoomStatus::Idle);

        // A second interrupt with the same token is a no-op.
        assert!(!manager.interrupt_transition(first.token));
    }

    #[test]
    fn subset_fit_never_drops_below_the_content_floor() {
        let mut manager = manager();
        // A sliver of content would fit at a huge scale; the ceiling holds.
        let transition = manager.begin_rezoom(RectF::new(0.0, 0.0, 10.0, 10.0), None);
        assert!(transition.target.scale <= 2.5);

        // Whole-content fit sits exactly at the floor.
        let whole = manager.begin_rezoom(RectF::new(0.0, 0.0, 2000.0, 2000.0), None);
        assert!((whole.target.scale - manager.min_scale()).abs() < 1e-9);
    }

    #[test]
    fn resize_correction_waits_for_quiet_and_skips_valid_cameras() {
        let mut manager = manager();
        let fit = manager.begin_rezoom(RectF::new(0.0, 0.0, 2000.0, 2000.0), None);
        manager.complete_transition(fit.token, fit.target);

        // Same canvas size: the fitted camera is still legal, so the quiet
        // period ends without a correction.
        manager.note_resize(SizeF { w: 1280.0, h: 800.0 }, 0.0);
        assert!(manager.poll_resize(100.0).is_none());
        assert!(manager.resize_debounce.pending());
        assert!(manager.poll_resize(150.0).is_none());
        assert!(!manager.resize_debounce.pending());
    }

    #[test]
    fn resize_correction_fires_when_the_camera_violates_new_limits() {
        let mut manager = manager();
        let fit = manager.begin_rezoom(RectF::new(0.0, 0.0, 2000.0, 2000.0), None);
        manager.complete_transition(fit.token, fit.target);
        let old_scale = manager.camera().scale;

        // A much larger canvas raises the zoom floor above the old scale.
        manager.note_resize(SizeF { w: 4000.0, h: 4000.0 }, 0.0);
        assert!(manager.min_scale() > old_scale);

        let correction = manager.poll_resize(200.0).unwrap();
        assert!((correction.target.scale - manager.min_scale()).abs() < 1e-9);
        assert!(matches!(manager.status(), ZoomStatus::ResizePending { .. }));

        assert!(manager.complete_transition(correction.token, correction.target));
    }

    #[test]
    fn each_resize_event_pushes_the_deadline_back() {
        let mut manager = manager();
        manager.note_resize(SizeF { w: 1000.0, h: 700.0 }, 0.0);
        manager.note_resize(SizeF { w: 900.0, h: 700.0 }, 100.0);

        // 140ms after the first event but only 40ms after the second.
        assert!(manager.poll_resize(140.0).is_none());
        assert!(manager.resize_debounce.pending());
    }

    #[test]
    fn update_camera_clamps_scale_and_translate() {
        let mut manager = manager();
        let wild = CameraTransform { translate_x: 1.0e6, translate_y: 1.0e6, scale: 50.0 };
        let clamped = manager.update_camera(wild);

        assert_eq!(clamped.scale, 2.5);
        let extent = *manager.translate_extent().unwrap();
        assert!(clamped.translate_x <= -extent.x * clamped.scale);
        assert_eq!(manager.camera(), clamped);
    }
}

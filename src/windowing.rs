// Visibility windowing.
//
// Large flowcharts render only what the camera can see plus a buffer
// margin. The core computes the visible id sets and tracks which ids are
// newly visible since the previous computation, so the frontend can replay
// entry animations only for nodes scrolling back into view.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::layout::{PointF, RectF, SizeF};
use crate::view::{Link, NodeId};
use crate::viewport::CameraTransform;

/// How a node's published position relates to its measured box.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// Grid views: position is the card's top-left corner.
    TopLeft,
    /// Tree views: position is center-x at the top edge.
    TopCenter,
}

/// The camera's view window in content coordinates.
pub fn viewport_rect(camera: CameraTransform, canvas: SizeF) -> RectF {
    let x = -camera.translate_x / camera.scale;
    let y = -camera.translate_y / camera.scale;
    RectF::new(x, y, canvas.w / camera.scale, canvas.h / camera.scale)
}

/// Content-space box of a node from its published position and size.
pub fn node_aabb(position: PointF, size: SizeF, anchor: Anchor) -> RectF {
    match anchor {
        Anchor::TopLeft => RectF::new(position.x, position.y, size.w, size.h),
        Anchor::TopCenter => RectF::new(position.x - size.w / 2.0, position.y, size.w, size.h),
    }
}

/// Union of all node boxes; `None` for an empty map.
pub fn content_bounds(boxes: &HashMap<NodeId, RectF>) -> Option<RectF> {
    boxes.values().copied().reduce(|acc, rect| acc.union(&rect))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisibleSet {
    pub visible_nodes: HashSet<NodeId>,
    pub reappeared_nodes: HashSet<NodeId>,
    pub visible_links: HashSet<String>,
    pub reappeared_links: HashSet<String>,
}

/// Carries the previous visible sets between computations.
#[derive(Debug, Default)]
pub struct Windowing {
    previous_nodes: HashSet<NodeId>,
    previous_links: HashSet<String>,
}

impl Windowing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from previous visible sets held by the caller, for boundaries
    /// that do not keep the tracker alive between calls.
    pub fn with_previous(nodes: HashSet<NodeId>, links: HashSet<String>) -> Self {
        Self { previous_nodes: nodes, previous_links: links }
    }

    /// Forget history, e.g. on a view switch. The next computation counts
    /// everything visible as reappeared.
    pub fn reset(&mut self) {
        self.previous_nodes.clear();
        self.previous_links.clear();
    }

    /// Cull against the viewport grown by `buffer_fraction` of its larger
    /// dimension. A link survives if any endpoint is visible, or if the
    /// whole content box still overlaps the buffered window (long edges
    /// whose endpoints both sit off-screen).
    pub fn compute(
        &mut self,
        boxes: &HashMap<NodeId, RectF>,
        links: &[Link],
        viewport: RectF,
        buffer_fraction: f64,
    ) -> VisibleSet {
        let buffer = buffer_fraction * viewport.w.max(viewport.h);
        let window = viewport.expanded(buffer);
        let all_bounds = content_bounds(boxes);

        let visible_nodes: HashSet<NodeId> = boxes
            .iter()
            .filter(|(_, rect)| window.overlaps(rect))
            .map(|(id, _)| id.clone())
            .collect();

        let visible_links: HashSet<String> = links
            .iter()
            .filter(|link| {
                let endpoint_visible = link
                    .endpoints
                    .iter()
                    .any(|id| visible_nodes.contains(id));
                endpoint_visible
                    || all_bounds
                        .as_ref()
                        .is_some_and(|bounds| window.overlaps(bounds))
            })
            .map(|link| link.id.clone())
            .collect();

        let reappeared_nodes = visible_nodes
            .difference(&self.previous_nodes)
            .cloned()
            .collect();
        let reappeared_links = visible_links
            .difference(&self.previous_links)
            .cloned()
            .collect();

        self.previous_nodes = visible_nodes.clone();
        self.previous_links = visible_links.clone();

        VisibleSet {
            visible_nodes,
            reappeared_nodes,
            visible_links,
            reappeared_links,
        }
    }
}

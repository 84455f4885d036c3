// Positioning state machine.
//
// Sequences the measure -> layout protocol: node defs arrive first, the
// frontend's shell pass reports one measured size per node, and the view's
// position builder runs exactly once the full target id set is covered.
// Published maps are replaced wholesale, never edited in place, so the
// reactive container can detect change by reference.

use std::collections::HashMap;
use std::mem;

use serde::Serialize;

use crate::layout::{GridParams, PointF, SizeF, TreeParams};
use crate::view::{NodeId, ViewGraph, build_node_positions};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositioningPhase {
    Init,
    InProgress,
    Ready,
}

/// A node def with its measured size and computed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: NodeId,
    pub position: PointF,
    pub size: SizeF,
}

#[derive(Debug)]
enum PositioningState {
    Init,
    InProgress {
        view: ViewGraph,
    },
    Ready {
        view: ViewGraph,
        positioned: HashMap<NodeId, PositionedNode>,
    },
}

#[derive(Debug)]
pub struct Positioner {
    state: PositioningState,
    /// Snapshot of the previous view's positioned nodes, kept alive for the
    /// cross-fade until the new nodes finish their entry animation.
    previous: Option<HashMap<NodeId, PositionedNode>>,
    /// Measured sizes, keyed by stable node id. Retained across view
    /// switches; ids never named by a target set are not stored.
    dimensions: HashMap<NodeId, SizeF>,
    grid_params: GridParams,
    tree_params: TreeParams,
}

impl Default for Positioner {
    fn default() -> Self {
        Self::new(GridParams::default(), TreeParams::default())
    }
}

impl Positioner {
    pub fn new(grid_params: GridParams, tree_params: TreeParams) -> Self {
        Self {
            state: PositioningState::Init,
            previous: None,
            dimensions: HashMap::new(),
            grid_params,
            tree_params,
        }
    }

    pub fn phase(&self) -> PositioningPhase {
        match self.state {
            PositioningState::Init => PositioningPhase::Init,
            PositioningState::InProgress { .. } => PositioningPhase::InProgress,
            PositioningState::Ready { .. } => PositioningPhase::Ready,
        }
    }

    pub fn view(&self) -> Option<&ViewGraph> {
        match &self.state {
            PositioningState::Init => None,
            PositioningState::InProgress { view } | PositioningState::Ready { view, .. } => {
                Some(view)
            }
        }
    }

    /// Replace the displayed view. A ready view's positioned nodes are
    /// snapshotted for cross-fade continuity; if the new target set is
    /// already fully measured, positioning completes immediately.
    pub fn set_view(&mut self, view: ViewGraph) {
        let old = mem::replace(&mut self.state, PositioningState::InProgress { view });
        if let PositioningState::Ready { positioned, .. } = old {
            self.previous = Some(positioned);
        }
        self.try_build();
    }

    /// Record one measured size. Ids outside the current target set and
    /// unchanged sizes are no-ops; a changed size republishes the layout.
    pub fn register_dimensions(&mut self, id: &str, size: SizeF) {
        let in_target = match &self.state {
            PositioningState::Init => false,
            PositioningState::InProgress { view } | PositioningState::Ready { view, .. } => {
                view.contains(id)
            }
        };
        if !in_target {
            return;
        }
        if self.dimensions.get(id) == Some(&size) {
            return;
        }

        self.dimensions.insert(id.to_string(), size);
        self.try_build();
    }

    /// Run the builder if the active target set is fully covered.
    fn try_build(&mut self) {
        let state = mem::replace(&mut self.state, PositioningState::Init);
        self.state = match state {
            PositioningState::InProgress { view } | PositioningState::Ready { view, .. } => {
                let covered = view
                    .ordered_ids()
                    .iter()
                    .all(|id| self.dimensions.contains_key(id));
                if covered {
                    let positioned = self.build_positions(&view);
                    PositioningState::Ready { view, positioned }
                } else {
                    PositioningState::InProgress { view }
                }
            }
            PositioningState::Init => PositioningState::Init,
        };
    }

    fn build_positions(&self, view: &ViewGraph) -> HashMap<NodeId, PositionedNode> {
        let positions =
            build_node_positions(view, &self.dimensions, &self.grid_params, &self.tree_params);
        view.ordered_ids()
            .iter()
            .map(|id| {
                let position = *positions
                    .get(id)
                    .unwrap_or_else(|| panic!("builder produced no position for node '{id}'"));
                let node = PositionedNode {
                    id: id.clone(),
                    position,
                    size: self.dimensions[id],
                };
                (id.clone(), node)
            })
            .collect()
    }

    pub fn positioned_nodes(&self) -> Option<&HashMap<NodeId, PositionedNode>> {
        match &self.state {
            PositioningState::Ready { positioned, .. } => Some(positioned),
            _ => None,
        }
    }

    /// Position of one node. Asking for a node the builder never positioned
    /// is a programming error; a silent (0, 0) would corrupt the render.
    pub fn position(&self, id: &str) -> PointF {
        match &self.state {
            PositioningState::Ready { positioned, .. } => match positioned.get(id) {
                Some(node) => node.position,
                None => panic!("no position computed for node '{id}'"),
            },
            _ => panic!("positioning is not ready; no position for node '{id}'"),
        }
    }

    pub fn previous_snapshot(&self) -> Option<&HashMap<NodeId, PositionedNode>> {
        self.previous.as_ref()
    }

    /// Called by the animation layer once every newly appeared node has
    /// finished its entry animation.
    pub fn entry_animation_complete(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{NodeContext, ViewKind};

    fn grid_view(ids: &[&str]) -> ViewGraph {
        let mut view = ViewGraph::new(ViewKind::Search);
        for id in ids {
            view.push(
                id.to_string(),
                NodeContext::SectionTitle { text: id.to_string() },
            );
        }
        view
    }

    fn size(w: f64, h: f64) -> SizeF {
        SizeF { w, h }
    }

    #[test]
    fn layout_runs_once_the_target_set_is_covered() {
        let mut positioner = Positioner::default();
        assert_eq!(positioner.phase(), PositioningPhase::Init);

        positioner.set_view(grid_view(&["a", "b"]));
        assert_eq!(positioner.phase(), PositioningPhase::InProgress);

        positioner.register_dimensions("a", size(100.0, 40.0));
        assert_eq!(positioner.phase(), PositioningPhase::InProgress);

        positioner.register_dimensions("b", size(100.0, 40.0));
        assert_eq!(positioner.phase(), PositioningPhase::Ready);
        assert_eq!(positioner.position("a"), PointF { x: 0.0, y: 0.0 });
        assert_eq!(positioner.position("b"), PointF { x: 124.0, y: 0.0 });
    }

    #[test]
    fn registrations_outside_the_target_set_are_noops() {
        let mut positioner = Positioner::default();
        positioner.register_dimensions("stray", size(10.0, 10.0));
        assert_eq!(positioner.phase(), PositioningPhase::Init);

        positioner.set_view(grid_view(&["a", "stray"]));
        positioner.register_dimensions("a", size(10.0, 10.0));
        // "stray" was never retained, so coverage is still incomplete.
        assert_eq!(positioner.phase(), PositioningPhase::InProgress);
    }

    #[test]
    fn redundant_registration_keeps_the_published_layout() {
        let mut positioner = Positioner::default();
        positioner.set_view(grid_view(&["a"]));
        positioner.register_dimensions("a", size(10.0, 10.0));
        let before = positioner.positioned_nodes().unwrap().clone();

        positioner.register_dimensions("a", size(10.0, 10.0));
        assert_eq!(positioner.positioned_nodes().unwrap(), &before);
    }

    #[test]
    fn changed_size_republished_while_ready() {
        let mut positioner = Positioner::default();
        positioner.set_view(grid_view(&["a", "b"]));
        positioner.register_dimensions("a", size(100.0, 40.0));
        positioner.register_dimensions("b", size(100.0, 40.0));

        positioner.register_dimensions("a", size(200.0, 40.0));
        assert_eq!(positioner.phase(), PositioningPhase::Ready);
        assert_eq!(positioner.position("b").x, 224.0);
    }

    #[test]
    fn view_switch_snapshots_and_entry_animation_clears() {
        let mut positioner = Positioner::default();
        positioner.set_view(grid_view(&["a"]));
        positioner.register_dimensions("a", size(10.0, 10.0));
        assert!(positioner.previous_snapshot().is_none());

        positioner.set_view(grid_view(&["b"]));
        assert_eq!(positioner.phase(), PositioningPhase::InProgress);
        let snapshot = positioner.previous_snapshot().unwrap();
        assert!(snapshot.contains_key("a"));

        positioner.register_dimensions("b", size(10.0, 10.0));
        assert!(positioner.previous_snapshot().is_some());

        positioner.entry_animation_complete();
        assert!(positioner.previous_snapshot().is_none());
    }

    #[test]
    fn retained_dimensions_complete_a_revisited_view_immediately() {
        let mut positioner = Positioner::default();
        positioner.set_view(grid_view(&["a"]));
        positioner.register_dimensions("a", size(10.0, 10.0));

        positioner.set_view(grid_view(&["b"]));
        positioner.register_dimensions("b", size(10.0, 10.0));

        positioner.set_view(grid_view(&["a"]));
        assert_eq!(positioner.phase(), PositioningPhase::Ready);
    }

    #[test]
    #[should_panic(expected = "no position computed")]
    fn asking_for_an_unpositioned_id_is_fatal() {
        let mut positioner = Positioner::default();
        positioner.set_view(grid_view(&["a"]));
        positioner.register_dimensions("a", size(10.0, 10.0));
        positioner.position("ghost");
    }

    #[test]
    #[should_panic(expected = "not ready")]
    fn asking_before_ready_is_fatal() {
        let positioner = Positioner::default();
        positioner.position("a");
    }
}

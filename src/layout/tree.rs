// Flowchart tree layout.
//
// Two passes over a rooted NodeDef tree:
// 1. bottom-up: subtree width requirements + per-depth row heights
// 2. top-down: slot assignment left-to-right, then parent recentering on
//    the geometric midpoint of its children
//
// Positions: x is the node's horizontal center, y the top of its depth row.
// Every node gets exactly one position; identical input yields identical
// output; sibling subtrees never overlap in x.

use std::collections::HashMap;

use crate::view::{NodeId, ViewGraph};

use super::{PointF, SizeF, TreeParams};

pub fn layout_tree(
    graph: &ViewGraph,
    dims: &HashMap<NodeId, SizeF>,
    params: &TreeParams,
) -> HashMap<NodeId, PointF> {
    let Some(root) = graph.root() else {
        return HashMap::new();
    };

    let mut widths: HashMap<NodeId, f64> = HashMap::with_capacity(graph.len());
    subtree_width(graph, root, dims, params, &mut widths);

    let y_offsets = depth_offsets(graph, root, dims, params);

    let mut positions = HashMap::with_capacity(graph.len());
    place(graph, root, 0.0, 0, &widths, &y_offsets, params, &mut positions);
    positions
}

fn require_size(dims: &HashMap<NodeId, SizeF>, id: &str) -> SizeF {
    match dims.get(id) {
        Some(size) => *size,
        // A complete dimensions map is the caller's contract. Silent (0,0)
        // here would corrupt the whole layout.
        None => panic!("tree layout: no measured dimensions for node '{id}'"),
    }
}

/// Bottom-up width requirement: a leaf needs its own width, an internal
/// node the sum of its children plus inter-child margins.
fn subtree_width(
    graph: &ViewGraph,
    id: &str,
    dims: &HashMap<NodeId, SizeF>,
    params: &TreeParams,
    out: &mut HashMap<NodeId, f64>,
) -> f64 {
    let children = graph.children(id);
    let width = if children.is_empty() {
        require_size(dims, id).w
    } else {
        let sum: f64 = children
            .iter()
            .map(|child| subtree_width(graph, child, dims, params, out))
            .sum();
        sum + (children.len() - 1) as f64 * params.h_margin
    };
    out.insert(id.to_string(), width);
    width
}

/// y offset per depth: cumulative prior row max-heights plus margins.
fn depth_offsets(
    graph: &ViewGraph,
    root: &str,
    dims: &HashMap<NodeId, SizeF>,
    params: &TreeParams,
) -> Vec<f64> {
    let mut row_heights: Vec<f64> = Vec::new();
    let mut frontier: Vec<&str> = vec![root];

    while !frontier.is_empty() {
        let mut tallest = 0.0f64;
        let mut next: Vec<&str> = Vec::new();
        for id in frontier {
            tallest = tallest.max(require_size(dims, id).h);
            next.extend(graph.children(id).iter().map(NodeId::as_str));
        }
        row_heights.push(tallest);
        frontier = next;
    }

    let mut offsets = Vec::with_capacity(row_heights.len());
    let mut y = 0.0;
    for height in row_heights {
        offsets.push(y);
        y += height + params.v_margin;
    }
    offsets
}

fn place(
    graph: &ViewGraph,
    id: &str,
    x: f64,
    depth: usize,
    widths: &HashMap<NodeId, f64>,
    y_offsets: &[f64],
    params: &TreeParams,
    out: &mut HashMap<NodeId, PointF>,
) {
    let y = y_offsets[depth];
    let children = graph.children(id);

    if children.is_empty() {
        // Leaves keep the slot position handed down by the parent; a
        // childless root centers on its own box at the origin.
        out.insert(id.to_string(), PointF { x, y });
        return;
    }

    let total = widths[id];
    let mut cursor = x - total / 2.0;
    let mut child_xs = Vec::with_capacity(children.len());

    for child in children {
        let requirement = widths[child.as_str()];
        place(
            graph,
            child,
            cursor + requirement / 2.0,
            depth + 1,
            widths,
            y_offsets,
            params,
            out,
        );
        child_xs.push(out[child.as_str()].x);
        cursor += requirement + params.h_margin;
    }

    // Recenter on the children: middle child for odd counts, mean of the
    // two central children for even counts.
    let n = child_xs.len();
    let centered_x = if n % 2 == 1 {
        child_xs[n / 2]
    } else {
        (child_xs[n / 2 - 1] + child_xs[n / 2]) / 2.0
    };
    out.insert(id.to_string(), PointF { x: centered_x, y });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{NodeContext, ViewKind};

    fn album(id: &str) -> NodeContext {
        NodeContext::Album { album_id: id.to_string() }
    }

    fn graph_with_children(child_ids: &[&str]) -> ViewGraph {
        let mut graph = ViewGraph::new(ViewKind::Flowchart);
        graph.set_root("root".to_string(), album("seed"));
        for id in child_ids {
            graph.add_child("root", id.to_string(), album(id));
        }
        graph
    }

    fn uniform_dims(graph: &ViewGraph, w: f64, h: f64) -> HashMap<NodeId, SizeF> {
        graph
            .ordered_ids()
            .iter()
            .map(|id| (id.clone(), SizeF { w, h }))
            .collect()
    }

    fn params() -> TreeParams {
        TreeParams { h_margin: 40.0, v_margin: 60.0 }
    }

    #[test]
    fn childless_root_sits_at_the_origin() {
        let graph = graph_with_children(&[]);
        let dims = uniform_dims(&graph, 120.0, 80.0);
        let positions = layout_tree(&graph, &dims, &params());

        assert_eq!(positions.len(), 1);
        assert_eq!(positions["root"], PointF { x: 0.0, y: 0.0 });
    }

    #[test]
    fn two_equal_children_center_the_root_on_their_mean() {
        let graph = graph_with_children(&["a", "b"]);
        let dims = uniform_dims(&graph, 100.0, 50.0);
        let positions = layout_tree(&graph, &dims, &params());

        let mean = (positions["a"].x + positions["b"].x) / 2.0;
        assert_eq!(positions["root"].x, mean);
        // Slots: total = 100 + 40 + 100 = 240, centers at -70 and +70.
        assert_eq!(positions["a"].x, -70.0);
        assert_eq!(positions["b"].x, 70.0);
    }

    #[test]
    fn three_children_center_the_root_on_the_middle_child() {
        let mut graph = graph_with_children(&["a", "b", "c"]);
        // Give the middle child a subtree so its x shifts off-slot.
        graph.add_child("b", "b1".to_string(), album("b1"));
        graph.add_child("b", "b2".to_string(), album("b2"));
        let mut dims = uniform_dims(&graph, 100.0, 50.0);
        dims.insert("b1".to_string(), SizeF { w: 30.0, h: 50.0 });
        dims.insert("b2".to_string(), SizeF { w: 90.0, h: 50.0 });

        let positions = layout_tree(&graph, &dims, &params());
        assert_eq!(positions["root"].x, positions["b"].x);
    }

    #[test]
    fn depth_rows_stack_by_tallest_node_plus_margin() {
        let mut graph = graph_with_children(&["a", "b"]);
        graph.add_child("a", "a1".to_string(), album("a1"));
        let mut dims = uniform_dims(&graph, 100.0, 50.0);
        dims.insert("root".to_string(), SizeF { w: 100.0, h: 72.0 });
        dims.insert("b".to_string(), SizeF { w: 100.0, h: 64.0 });

        let positions = layout_tree(&graph, &dims, &params());
        assert_eq!(positions["root"].y, 0.0);
        // Depth-1 row starts below the 72-tall root.
        assert_eq!(positions["a"].y, 132.0);
        assert_eq!(positions["b"].y, 132.0);
        // Depth-2 row below the 64-tall depth-1 row.
        assert_eq!(positions["a1"].y, 132.0 + 64.0 + 60.0);
    }

    #[test]
    fn sibling_subtrees_never_overlap_in_x() {
        let mut graph = graph_with_children(&["a", "b", "c"]);
        graph.add_child("a", "a1".to_string(), album("a1"));
        graph.add_child("a", "a2".to_string(), album("a2"));
        graph.add_child("c", "c1".to_string(), album("c1"));
        let mut dims = uniform_dims(&graph, 80.0, 50.0);
        dims.insert("a1".to_string(), SizeF { w: 140.0, h: 50.0 });
        dims.insert("c1".to_string(), SizeF { w: 200.0, h: 50.0 });

        let positions = layout_tree(&graph, &dims, &params());

        let span = |ids: &[&str]| -> (f64, f64) {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for id in ids {
                let half = dims[*id].w / 2.0;
                lo = lo.min(positions[*id].x - half);
                hi = hi.max(positions[*id].x + half);
            }
            (lo, hi)
        };

        let (_, a_hi) = span(&["a", "a1", "a2"]);
        let (b_lo, b_hi) = span(&["b"]);
        let (c_lo, _) = span(&["c", "c1"]);
        assert!(a_hi <= b_lo, "a subtree ({a_hi}) crosses b ({b_lo})");
        assert!(b_hi <= c_lo, "b subtree ({b_hi}) crosses c ({c_lo})");
    }

    #[test]
    fn leaf_row_spans_the_sum_of_leaf_widths_plus_margins() {
        let graph = graph_with_children(&["a", "b", "c"]);
        let mut dims = uniform_dims(&graph, 100.0, 50.0);
        dims.insert("b".to_string(), SizeF { w: 60.0, h: 50.0 });

        let positions = layout_tree(&graph, &dims, &params());
        let left = positions["a"].x - 50.0;
        let right = positions["c"].x + 50.0;
        // 100 + 60 + 100 plus two 40-wide margins.
        assert_eq!(right - left, 340.0);
    }

    #[test]
    fn identical_input_yields_identical_output() {
        let mut graph = graph_with_children(&["a", "b"]);
        graph.add_child("b", "b1".to_string(), album("b1"));
        let dims = uniform_dims(&graph, 90.0, 40.0);

        let first = layout_tree(&graph, &dims, &params());
        let second = layout_tree(&graph, &dims, &params());
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "no measured dimensions")]
    fn missing_dimensions_are_fatal() {
        let graph = graph_with_children(&["a"]);
        let mut dims = uniform_dims(&graph, 90.0, 40.0);
        dims.remove("a");
        layout_tree(&graph, &dims, &params());
    }
}

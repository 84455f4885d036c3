// View node model.
//
// A ViewGraph is the id-addressed description of everything the active view
// displays, before sizes or positions exist. It is replaced wholesale on
// view switch and grown/shrunk incrementally on flowchart expand/prune.
//
// Invariants:
// - node ids are unique within a graph
// - a child's parent pointer references a node in the same map
// - `order` holds every node id exactly once, in insertion order (the
//   display order the grid packer consumes)

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

mod builders;

pub use builders::{
    album_node_id, artist_node_id, build_discography_nodes, build_flowchart_root,
    build_home_nodes, build_node_positions, build_search_nodes, expand_with_recommendations,
    genre_node_id,
};

pub type NodeId = String;

/// What a node displays. The renderer resolves display data (titles, cover
/// art) through the catalog selectors; the core only carries the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeContext {
    Artist { artist_id: String, name: String },
    Album { album_id: String },
    Genre { name: String },
    SectionTitle { text: String },
    IconButton { action: String },
    AppTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: NodeId,
    pub context: NodeContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<NodeId>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    Home,
    Search,
    Discography,
    Flowchart,
}

/// A link fanning out from one node to its expansion children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub endpoints: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ViewGraph {
    kind: ViewKind,
    nodes: HashMap<NodeId, NodeDef>,
    order: Vec<NodeId>,
    root: Option<NodeId>,
}

impl ViewGraph {
    pub fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            nodes: HashMap::new(),
            order: Vec::new(),
            root: None,
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&NodeDef> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn children(&self, id: &str) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// All node ids in insertion order.
    pub fn ordered_ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeDef> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Insert a parentless node. Duplicate ids are skipped with a warning.
    pub fn push(&mut self, id: NodeId, context: NodeContext) {
        if self.nodes.contains_key(&id) {
            warn!("view graph already contains node '{id}', skipping insert");
            return;
        }
        self.order.push(id.clone());
        self.nodes.insert(
            id.clone(),
            NodeDef { id, context, parent: None, children: Vec::new() },
        );
    }

    /// Insert the root node of a tree-shaped view.
    pub fn set_root(&mut self, id: NodeId, context: NodeContext) {
        self.push(id.clone(), context);
        self.root = Some(id);
    }

    /// Attach a child under `parent`. Returns false (with a warning) when
    /// the parent is missing or the id already exists.
    pub fn add_child(&mut self, parent: &str, id: NodeId, context: NodeContext) -> bool {
        if !self.nodes.contains_key(parent) {
            warn!("cannot attach '{id}': parent '{parent}' is not in the view graph");
            return false;
        }
        if self.nodes.contains_key(&id) {
            warn!("view graph already contains node '{id}', skipping attach");
            return false;
        }

        self.order.push(id.clone());
        self.nodes.insert(
            id.clone(),
            NodeDef {
                id: id.clone(),
                context,
                parent: Some(parent.to_string()),
                children: Vec::new(),
            },
        );
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(id);
        }
        true
    }

    /// Remove a node and all its descendants. A missing id is a no-op.
    pub fn remove_subtree(&mut self, id: &str) {
        if !self.nodes.contains_key(id) {
            return;
        }

        let mut doomed = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            stack.extend(self.children(&current).iter().cloned());
            doomed.push(current);
        }

        if let Some(parent) = self.nodes.get(id).and_then(|node| node.parent.clone())
            && let Some(parent_node) = self.nodes.get_mut(&parent)
        {
            parent_node.children.retain(|child| child != id);
        }

        for gone in &doomed {
            self.nodes.remove(gone);
        }
        self.order.retain(|kept| !doomed.contains(kept));

        if self.root.as_deref() == Some(id) {
            self.root = None;
        }
    }

    /// Multi-target links: one per node with children, endpoints
    /// [parent, children...], in insertion order.
    pub fn links(&self) -> Vec<Link> {
        self.iter()
            .filter(|node| !node.children.is_empty())
            .map(|node| {
                let mut endpoints = Vec::with_capacity(node.children.len() + 1);
                endpoints.push(node.id.clone());
                endpoints.extend(node.children.iter().cloned());
                Link { id: format!("link:{}", node.id), endpoints }
            })
            .collect()
    }
}

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{HierarchyInput, NodeId, RawNode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf { category: String },
    Branch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub name: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub aggregate_value: f64,
    /// Sorted descending by `aggregate_value`; equal values keep input order.
    pub children: Vec<NodeId>,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn category(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf { category } => Some(category),
            NodeKind::Branch => None,
        }
    }
}

/// Weighted tree built once from the input document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hierarchy {
    root: NodeId,
    nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    pub fn build(input: &HierarchyInput) -> Result<Self> {
        let mut nodes: Vec<HierarchyNode> = Vec::with_capacity(128);
        let root = insert(input, None, 0, &mut nodes);
        tracing::debug!(
            nodes = nodes.len(),
            total = nodes[root.index()].aggregate_value,
            "hierarchy built"
        );
        Ok(Self { root, nodes })
    }

    pub fn from_raw(raw: &RawNode) -> Result<Self> {
        let input = HierarchyInput::try_from(raw)?;
        Self::build(&input)
    }

    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[self.root.index()]
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.node(id).parent.map(|p| self.node(p))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &HierarchyNode> + '_ {
        self.node(id).children.iter().map(move |c| self.node(*c))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn total_value(&self) -> f64 {
        self.root().aggregate_value
    }

    /// All leaves in pre-order over the sorted children.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.is_leaf() {
                out.push(id);
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Names of the root's children in sorted order, first occurrence wins.
    pub fn top_level_categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for child in self.children(self.root) {
            if !out.iter().any(|c| c == &child.name) {
                out.push(child.name.clone());
            }
        }
        out
    }
}

fn insert(
    input: &HierarchyInput,
    parent: Option<NodeId>,
    depth: usize,
    nodes: &mut Vec<HierarchyNode>,
) -> NodeId {
    let id = NodeId(nodes.len() as u64);
    match input {
        HierarchyInput::Leaf {
            name,
            category,
            value,
        } => {
            nodes.push(HierarchyNode {
                id,
                parent,
                name: name.clone(),
                kind: NodeKind::Leaf {
                    category: category.clone(),
                },
                depth,
                aggregate_value: *value,
                children: Vec::new(),
            });
        }
        HierarchyInput::Branch { name, children } => {
            nodes.push(HierarchyNode {
                id,
                parent,
                name: name.clone(),
                kind: NodeKind::Branch,
                depth,
                aggregate_value: 0.0,
                children: Vec::with_capacity(children.len()),
            });
            let mut ids: Vec<NodeId> = children
                .iter()
                .map(|c| insert(c, Some(id), depth + 1, nodes))
                .collect();
            // sort_by is stable, so ties keep document order
            ids.sort_by(|a, b| {
                nodes[b.index()]
                    .aggregate_value
                    .total_cmp(&nodes[a.index()].aggregate_value)
            });
            let sum = ids.iter().map(|c| nodes[c.index()].aggregate_value).sum();
            let node = &mut nodes[id.index()];
            node.aggregate_value = sum;
            node.children = ids;
        }
    }
    id
}

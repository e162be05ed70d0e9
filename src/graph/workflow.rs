use std::collections::BTreeMap;

use crate::foundation::error::{FlowError, FlowResult};
use crate::graph::node::{Node, NodeId, NodeInputs};

/// Graph container consumed by the conversion engine.
///
/// The engine only appends nodes and inspects the producer of a location; it never edits or
/// removes existing nodes.
pub trait WorkflowGraph {
    /// Append a node and return its identifier.
    ///
    /// When `id` is given it is used verbatim and must not already exist.
    fn create_node(
        &mut self,
        class_type: &str,
        inputs: NodeInputs,
        id: Option<&str>,
    ) -> FlowResult<NodeId>;

    /// Look up a node by identifier.
    fn node(&self, id: &NodeId) -> Option<&Node>;

    /// All node identifiers, in a stable order.
    fn node_ids(&self) -> Vec<NodeId>;

    /// Number of nodes in the graph.
    fn len(&self) -> usize;

    /// True when the graph holds no nodes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(transparent)]
/// In-memory workflow graph in the prompt JSON shape.
///
/// Generated ids are decimal strings from a counter that only moves forward, so an id is never
/// handed out twice even when callers insert explicit ids in between.
pub struct Workflow {
    nodes: BTreeMap<NodeId, Node>,
    #[serde(skip)]
    next_id: u64,
}

impl Workflow {
    /// Empty workflow whose generated ids start at `1`.
    pub fn new() -> Self {
        Self::with_first_id(1)
    }

    /// Empty workflow whose generated ids start at `first`.
    pub fn with_first_id(first: u64) -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: first,
        }
    }

    /// Iterate over `(id, node)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Count nodes of the given class type.
    pub fn count_class(&self, class_type: &str) -> usize {
        self.nodes
            .values()
            .filter(|n| n.class_type == class_type)
            .count()
    }

    /// Render the workflow as a JSON value.
    pub fn to_json(&self) -> FlowResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| FlowError::serde(format!("workflow to JSON: {e}")))
    }

    fn alloc_id(&mut self) -> NodeId {
        loop {
            let id = NodeId(self.next_id.to_string());
            self.next_id += 1;
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }
}

impl WorkflowGraph for Workflow {
    fn create_node(
        &mut self,
        class_type: &str,
        inputs: NodeInputs,
        id: Option<&str>,
    ) -> FlowResult<NodeId> {
        let id = match id {
            Some(explicit) => {
                let id = NodeId::new(explicit);
                if self.nodes.contains_key(&id) {
                    return Err(FlowError::misuse(format!(
                        "node id '{id}' is already in use, cannot create '{class_type}' with it"
                    )));
                }
                id
            }
            None => self.alloc_id(),
        };
        self.nodes.insert(
            id.clone(),
            Node {
                class_type: class_type.to_string(),
                inputs,
            },
        );
        Ok(id)
    }

    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/workflow.rs"]
mod tests;

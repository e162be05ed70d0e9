//! Workflow graph container: nodes, links and the [`WorkflowGraph`](workflow::WorkflowGraph)
//! seam the conversion engine writes through.

#[allow(missing_docs)]
pub mod class;
pub(crate) mod node;
pub(crate) mod workflow;

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeTuple;

#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
/// Identifier of a node inside a workflow graph.
pub struct NodeId(pub String);

impl NodeId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// One output slot of one node.
pub struct NodeRef {
    /// Producing node.
    pub node: NodeId,
    /// Output slot index on the producing node.
    pub slot: u32,
}

impl NodeRef {
    /// Reference output `slot` of `node`.
    pub fn new(node: impl Into<NodeId>, slot: u32) -> Self {
        Self {
            node: node.into(),
            slot,
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.node, self.slot)
    }
}

// Links use the `["<id>", slot]` shape of the prompt JSON.
impl serde::Serialize for NodeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.node)?;
        tup.serialize_element(&self.slot)?;
        tup.end()
    }
}

impl<'de> serde::Deserialize<'de> for NodeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (node, slot) = <(NodeId, u32)>::deserialize(deserializer)?;
        Ok(Self { node, slot })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
/// Value bound to a named node input: a literal or a link to another node's output.
pub enum InputValue {
    /// Link to an output slot.
    Link(NodeRef),
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// String literal.
    Str(String),
}

impl InputValue {
    /// The linked output, if this input is a link.
    pub fn as_link(&self) -> Option<&NodeRef> {
        match self {
            Self::Link(r) => Some(r),
            _ => None,
        }
    }

    /// The integer literal, if this input is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The string literal, if this input is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<NodeRef> for InputValue {
    fn from(value: NodeRef) -> Self {
        Self::Link(value)
    }
}

impl From<&NodeRef> for InputValue {
    fn from(value: &NodeRef) -> Self {
        Self::Link(value.clone())
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for InputValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for InputValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Named inputs of a node, ordered by name for stable output.
pub type NodeInputs = BTreeMap<String, InputValue>;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A single graph node: a class-type tag plus its named inputs.
pub struct Node {
    /// Node class the execution engine dispatches on.
    pub class_type: String,
    /// Named inputs.
    pub inputs: NodeInputs,
}

impl Node {
    /// Look up a named input.
    pub fn input(&self, name: &str) -> Option<&InputValue> {
        self.inputs.get(name)
    }

    /// Look up a named input that must be a link.
    pub fn link(&self, name: &str) -> Option<&NodeRef> {
        self.input(name).and_then(InputValue::as_link)
    }
}

/// Build a [`NodeInputs`] map from `(name, value)` pairs.
pub fn inputs<const N: usize>(pairs: [(&str, InputValue); N]) -> NodeInputs {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

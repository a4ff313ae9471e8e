//! Generic Data Tree
//!
//! Schema-addressed tree nodes independent of any generated class. Inner
//! nodes keep their children in insertion order keyed by [`NodeKey`]; a child
//! inserted under an existing key replaces the previous one in place.

pub mod builder;
pub mod resource_id;
pub mod value;

pub use builder::DataNodeBuilder;
pub use resource_id::{ResourceId, ResourceIdBuilder, ResourceIdCursor};
pub use value::{FromLeafValue, LeafValue};

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::SchemaId;

// =============================================================================
// Keys
// =============================================================================

/// One key component of a list instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyLeaf {
    schema_id: SchemaId,
    value: LeafValue,
}

impl KeyLeaf {
    pub fn new(schema_id: SchemaId, value: LeafValue) -> Self {
        Self { schema_id, value }
    }

    pub fn schema_id(&self) -> &SchemaId {
        &self.schema_id
    }

    pub fn name(&self) -> &str {
        self.schema_id.name()
    }

    pub fn value(&self) -> &LeafValue {
        &self.value
    }
}

/// Key leaves of a list instance in schema-declared order
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListKey {
    key_leafs: Vec<KeyLeaf>,
}

impl ListKey {
    pub fn new(key_leafs: Vec<KeyLeaf>) -> Self {
        Self { key_leafs }
    }

    pub fn key_leafs(&self) -> &[KeyLeaf] {
        &self.key_leafs
    }

    pub fn is_empty(&self) -> bool {
        self.key_leafs.is_empty()
    }
}

/// Value identifying one leaf-list entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeafListKey {
    value: LeafValue,
}

impl LeafListKey {
    pub fn new(value: LeafValue) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &LeafValue {
        &self.value
    }
}

/// Instance discriminator of a [`NodeKey`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKeyKind {
    Single,
    List(ListKey),
    LeafList(LeafListKey),
}

/// Identity of one data node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    schema_id: SchemaId,
    kind: NodeKeyKind,
}

impl NodeKey {
    /// Key of a single-instance node
    pub fn single(schema_id: SchemaId) -> Self {
        Self {
            schema_id,
            kind: NodeKeyKind::Single,
        }
    }

    /// Key of a list instance
    pub fn list(schema_id: SchemaId, key_leafs: Vec<KeyLeaf>) -> Self {
        Self {
            schema_id,
            kind: NodeKeyKind::List(ListKey::new(key_leafs)),
        }
    }

    /// Key of a leaf-list entry
    pub fn leaf_list(schema_id: SchemaId, value: LeafValue) -> Self {
        Self {
            schema_id,
            kind: NodeKeyKind::LeafList(LeafListKey::new(value)),
        }
    }

    /// The root sentinel key
    pub fn root() -> Self {
        Self::single(SchemaId::root())
    }

    pub fn schema_id(&self) -> &SchemaId {
        &self.schema_id
    }

    pub fn name(&self) -> &str {
        self.schema_id.name()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.schema_id.namespace()
    }

    pub fn kind(&self) -> &NodeKeyKind {
        &self.kind
    }

    pub fn list_key(&self) -> Option<&ListKey> {
        match &self.kind {
            NodeKeyKind::List(key) => Some(key),
            _ => None,
        }
    }

    pub fn leaf_list_key(&self) -> Option<&LeafListKey> {
        match &self.kind {
            NodeKeyKind::LeafList(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        match &self.kind {
            NodeKeyKind::Single => Ok(()),
            NodeKeyKind::List(key) => {
                for leaf in key.key_leafs() {
                    write!(f, "[{}={}]", leaf.name(), leaf.value())?;
                }
                Ok(())
            }
            NodeKeyKind::LeafList(key) => write!(f, "[.={}]", key.value()),
        }
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// Shape of a data node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataNodeKind {
    SingleInstanceNode,
    MultiInstanceNode,
    SingleInstanceLeafValueNode,
    MultiInstanceLeafValueNode,
}

/// Insertion-ordered children of an inner node
#[derive(Debug, Clone, Default)]
pub struct ChildMap {
    nodes: Vec<DataNode>,
    index: HashMap<NodeKey, usize>,
}

impl ChildMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a child, replacing any child with the same key in place
    ///
    /// Returns the replaced child.
    pub fn insert(&mut self, node: DataNode) -> Option<DataNode> {
        match self.index.get(node.key()) {
            Some(&slot) => Some(std::mem::replace(&mut self.nodes[slot], node)),
            None => {
                self.index.insert(node.key().clone(), self.nodes.len());
                self.nodes.push(node);
                None
            }
        }
    }

    pub fn get(&self, key: &NodeKey) -> Option<&DataNode> {
        self.index.get(key).map(|slot| &self.nodes[*slot])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl PartialEq for ChildMap {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl Eq for ChildMap {}

impl FromIterator<DataNode> for ChildMap {
    fn from_iter<I: IntoIterator<Item = DataNode>>(iter: I) -> Self {
        let mut map = ChildMap::new();
        for node in iter {
            map.insert(node);
        }
        map
    }
}

impl<'a> IntoIterator for &'a ChildMap {
    type Item = &'a DataNode;
    type IntoIter = std::slice::Iter<'a, DataNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl Serialize for ChildMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ChildMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let nodes = Vec::<DataNode>::deserialize(deserializer)?;
        Ok(nodes.into_iter().collect())
    }
}

/// Container, list instance or anydata node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerNode {
    key: NodeKey,
    kind: DataNodeKind,
    #[serde(default)]
    children: ChildMap,
}

impl InnerNode {
    pub fn new(key: NodeKey, kind: DataNodeKind) -> Self {
        Self {
            key,
            kind,
            children: ChildMap::new(),
        }
    }

    pub fn with_children(key: NodeKey, kind: DataNodeKind, children: ChildMap) -> Self {
        Self { key, kind, children }
    }

    pub fn children(&self) -> &ChildMap {
        &self.children
    }

    /// Add a child, replacing one with the same key
    pub fn add_child(&mut self, node: DataNode) -> Option<DataNode> {
        self.children.insert(node)
    }
}

/// Leaf or leaf-list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafNode {
    key: NodeKey,
    kind: DataNodeKind,
    value: LeafValue,
}

impl LeafNode {
    pub fn new(key: NodeKey, kind: DataNodeKind, value: LeafValue) -> Self {
        Self { key, kind, value }
    }

    pub fn value(&self) -> &LeafValue {
        &self.value
    }
}

/// Generic, schema-addressed tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataNode {
    Inner(InnerNode),
    Leaf(LeafNode),
}

impl DataNode {
    pub fn key(&self) -> &NodeKey {
        match self {
            DataNode::Inner(node) => &node.key,
            DataNode::Leaf(node) => &node.key,
        }
    }

    pub fn kind(&self) -> DataNodeKind {
        match self {
            DataNode::Inner(node) => node.kind,
            DataNode::Leaf(node) => node.kind,
        }
    }

    pub fn as_inner(&self) -> Option<&InnerNode> {
        match self {
            DataNode::Inner(node) => Some(node),
            DataNode::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            DataNode::Leaf(node) => Some(node),
            DataNode::Inner(_) => None,
        }
    }

    /// Children of an inner node; empty for leaves
    pub fn children(&self) -> std::slice::Iter<'_, DataNode> {
        match self {
            DataNode::Inner(node) => node.children.iter(),
            DataNode::Leaf(_) => (&[] as &[DataNode]).iter(),
        }
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&DataNode> {
        self.children().find(|c| c.key().name() == name)
    }

    /// Leaf value, if this is a leaf
    pub fn value(&self) -> Option<&LeafValue> {
        self.as_leaf().map(LeafNode::value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, value: LeafValue) -> DataNode {
        DataNode::Leaf(LeafNode::new(
            NodeKey::single(SchemaId::new(name, Some("urn:t".into()))),
            DataNodeKind::SingleInstanceLeafValueNode,
            value,
        ))
    }

    #[test]
    fn test_duplicate_key_overwrites_in_place() {
        let mut children = ChildMap::new();
        children.insert(leaf("a", LeafValue::Uint(1)));
        children.insert(leaf("b", LeafValue::Uint(2)));
        let replaced = children.insert(leaf("a", LeafValue::Uint(3)));

        assert_eq!(replaced.unwrap().value(), Some(&LeafValue::Uint(1)));
        let names: Vec<_> = children.iter().map(|c| c.key().name().to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(children.iter().next().unwrap().value(), Some(&LeafValue::Uint(3)));
    }

    #[test]
    fn test_key_equality_includes_values() {
        let id = SchemaId::new("entry", Some("urn:t".into()));
        let leaf_id = SchemaId::new("name", Some("urn:t".into()));
        let a = NodeKey::list(id.clone(), vec![KeyLeaf::new(leaf_id.clone(), "x".into())]);
        let b = NodeKey::list(id.clone(), vec![KeyLeaf::new(leaf_id, "y".into())]);
        assert_ne!(a, b);
        assert_ne!(NodeKey::leaf_list(id.clone(), 1u8.into()), NodeKey::leaf_list(id, 2u8.into()));
    }

    #[test]
    fn test_serde_keeps_child_order() {
        let mut node = InnerNode::new(
            NodeKey::single(SchemaId::new("top", Some("urn:t".into()))),
            DataNodeKind::SingleInstanceNode,
        );
        node.add_child(leaf("z", "1".into()));
        node.add_child(leaf("a", "2".into()));
        let tree = DataNode::Inner(node);

        let json = serde_json::to_string(&tree).unwrap();
        let back: DataNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.children().next().unwrap().key().name(), "z");
    }
}

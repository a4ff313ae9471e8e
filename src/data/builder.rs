//! Data Node Builder
//!
//! Cursor-based construction of data trees with stack discipline:
//! [`DataNodeBuilder::add_data_node`] pushes a node and descends into it,
//! [`DataNodeBuilder::exit_data_node`] completes it and returns to the parent.
//! Every node, leaves included, is exited exactly once.
//!
//! The builder is schema-aware. Names are resolved below the current schema
//! node (transparently through choice/case and augments), the node kind comes
//! from the schema, and a namespace left unset is taken from the schema node,
//! preferring the parent's namespace when names collide. List keys are
//! assembled on exit from the key-leaf children in schema order.

use tracing::trace;

use super::{

    ChildMap, DataNode, DataNodeKind, InnerNode, KeyLeaf, LeafNode, LeafValue, NodeKey, ResourceId,

};
use crate::error::{Result, RuntimeError};
use crate::registry::YangModelRegistry;
use crate::schema::{SchemaNodeKind, SchemaNodeRef};

#[derive(Debug)]
struct Frame<'r> {
    schema: SchemaNodeRef<'r>,
    value: Option<LeafValue>,
    children: ChildMap,
}

/// Stack-disciplined data tree builder
#[derive(Debug)]
pub struct DataNodeBuilder<'r> {
    registry: &'r YangModelRegistry,
    /// Schema node the built forest hangs under, `None` for the schema root
    base: Option<SchemaNodeRef<'r>>,
    stack: Vec<Frame<'r>>,
    forest: Vec<DataNode>,
}

impl<'r> DataNodeBuilder<'r> {
    /// Builder at the schema root
    pub fn new(registry: &'r YangModelRegistry) -> Self {
        Self::at(registry, None)
    }

    /// Builder for a subtree under the node addressed by `id`
    pub fn from_resource_id(registry: &'r YangModelRegistry, id: &ResourceId) -> Result<Self> {
        let base = registry.resolve_resource_id(id)?;
        if let Some(node) = base {
            if node.kind().is_leaf_like() {
                return Err(RuntimeError::structural(format!(
                    "cannot build data below {} '{}'",
                    node.kind(),
                    node.name()
                )));
            }
        }
        Ok(Self::at(registry, base))
    }

    pub(crate) fn at(registry: &'r YangModelRegistry, base: Option<SchemaNodeRef<'r>>) -> Self {
        Self {
            registry,
            base,
            stack: Vec::new(),
            forest: Vec::new(),
        }
    }

    /// Schema node of the current cursor position
    pub fn current_schema(&self) -> Option<SchemaNodeRef<'r>> {
        self.stack.last().map(|f| f.schema).or(self.base)
    }

    /// Number of open nodes
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Add the child `name` of the current node and descend into it
    pub fn add_data_node(
        &mut self,
        name: &str,
        namespace: Option<&str>,
        value: Option<LeafValue>,
    ) -> Result<&mut Self> {
        let current = self.current_schema();
        let inherited = current.and_then(|c| c.namespace());
        let child = self
            .registry
            .resolve_preferring(current, name, namespace, inherited)
            .ok_or_else(|| {
                RuntimeError::resolution(format!(
                    "no schema node '{}' under {}",
                    name,
                    current.map_or_else(|| "the schema root".to_string(), |c| c.path())
                ))
            })?
            .node;
        self.enter(child, value)
    }

    /// Descend into an already resolved schema node
    pub(crate) fn enter(
        &mut self,
        schema: SchemaNodeRef<'r>,
        value: Option<LeafValue>,
    ) -> Result<&mut Self> {
        if let Some(current) = self.current_schema() {
            if current.kind().is_leaf_like() {
                return Err(RuntimeError::structural(format!(
                    "cannot add '{}' below {} '{}'",
                    schema.name(),
                    current.kind(),
                    current.name()
                )));
            }
        }

        let value = match (schema.kind(), value) {
            (SchemaNodeKind::Leaf, value) => Some(value.unwrap_or(LeafValue::Empty)),
            (SchemaNodeKind::LeafList, Some(value)) => Some(value),
            (SchemaNodeKind::LeafList, None) => {
                return Err(RuntimeError::structural(format!(
                    "leaf-list '{}' entry needs a value",
                    schema.name()
                )));
            }
            (kind, Some(_)) => {
                return Err(RuntimeError::structural(format!(
                    "a value cannot be given for {} '{}'",
                    kind,
                    schema.name()
                )));
            }
            (_, None) => None,
        };

        trace!(node = %schema.name(), depth = self.stack.len(), "enter data node");
        self.stack.push(Frame {
            schema,
            value,
            children: ChildMap::new(),
        });
        Ok(self)
    }

    /// Complete the current node and return to its parent
    pub fn exit_data_node(&mut self) -> Result<&mut Self> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| RuntimeError::structural("exit_data_node called at the root"))?;
        let node = finish(frame)?;

        match self.stack.last_mut() {
            Some(parent) => {
                if let Some(replaced) = parent.children.insert(node) {
                    trace!(node = %replaced.key(), "replaced data node with an equal key");
                }
            }
            None => self.forest.push(node),
        }
        Ok(self)
    }

    /// Finish building and return the top-level nodes in insertion order
    pub fn build(self) -> Result<Vec<DataNode>> {
        if !self.stack.is_empty() {
            return Err(RuntimeError::structural(format!(
                "{} data node(s) were not exited",
                self.stack.len()
            )));
        }
        Ok(self.forest)
    }
}

fn finish(frame: Frame<'_>) -> Result<DataNode> {
    let schema = frame.schema;
    let id = schema.schema_id().clone();

    let node = match schema.kind() {
        SchemaNodeKind::Leaf => DataNode::Leaf(LeafNode::new(
            NodeKey::single(id),
            DataNodeKind::SingleInstanceLeafValueNode,
            frame.value.unwrap_or(LeafValue::Empty),
        )),
        SchemaNodeKind::LeafList => {
            let value = frame.value.unwrap_or(LeafValue::Empty);
            DataNode::Leaf(LeafNode::new(
                NodeKey::leaf_list(id, value.clone()),
                DataNodeKind::MultiInstanceLeafValueNode,
                value,
            ))
        }
        SchemaNodeKind::List => {
            let mut key_leafs = Vec::with_capacity(schema.keys().len());
            for key in schema.keys() {
                let leaf = frame
                    .children
                    .iter()
                    .filter(|c| c.kind() == DataNodeKind::SingleInstanceLeafValueNode)
                    .find(|c| c.key().name() == key)
                    .and_then(|c| {
                        let value = c.value()?.clone();
                        Some(KeyLeaf::new(c.key().schema_id().clone(), value))
                    })
                    .ok_or_else(|| {
                        RuntimeError::structural(format!(
                            "entry of list '{}' is missing key leaf '{}'",
                            schema.name(),
                            key
                        ))
                    })?;
                key_leafs.push(leaf);
            }
            DataNode::Inner(InnerNode::with_children(
                NodeKey::list(id, key_leafs),
                DataNodeKind::MultiInstanceNode,
                frame.children,
            ))
        }
        _ => DataNode::Inner(InnerNode::with_children(
            NodeKey::single(id),
            DataNodeKind::SingleInstanceNode,
            frame.children,
        )),
    };
    Ok(node)
}

//! Resource Identifiers
//!
//! Root-to-node paths in pure schema terms. Every id starts with the root
//! sentinel key `{name: "/", namespace: None}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{KeyLeaf, LeafValue, NodeKey, NodeKeyKind};
use crate::error::{Result, RuntimeError};
use crate::registry::YangModelRegistry;
use crate::schema::{SchemaId, SchemaNodeKind, SchemaNodeRef};

/// Path from the schema root to a data node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<NodeKey>", into = "Vec<NodeKey>")]
pub struct ResourceId {
    keys: Vec<NodeKey>,
}

impl ResourceId {
    /// The id of the schema root
    pub fn root() -> Self {
        Self {
            keys: vec![NodeKey::root()],
        }
    }

    /// Start building an id at the root
    pub fn builder() -> ResourceIdBuilder {
        ResourceIdBuilder::new()
    }

    /// Continue building below this id
    pub fn copy_builder(&self) -> ResourceIdBuilder {
        ResourceIdBuilder {
            keys: self.keys.clone(),
        }
    }

    /// All keys, root sentinel first
    pub fn keys(&self) -> &[NodeKey] {
        &self.keys
    }

    /// Keys below the root sentinel
    pub fn segments(&self) -> &[NodeKey] {
        &self.keys[1..]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_root(&self) -> bool {
        self.keys.len() == 1
    }

    /// Terminal key, `None` for the root id
    pub fn last_key(&self) -> Option<&NodeKey> {
        if self.is_root() {
            None
        } else {
            self.keys.last()
        }
    }

    /// The id without its terminal key, `None` for the root id
    pub fn parent(&self) -> Option<ResourceId> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            keys: self.keys[..self.keys.len() - 1].to_vec(),
        })
    }
}

impl TryFrom<Vec<NodeKey>> for ResourceId {
    type Error = RuntimeError;

    fn try_from(keys: Vec<NodeKey>) -> Result<Self> {
        match keys.first() {
            Some(first) if first.schema_id().is_root() && first.kind() == &NodeKeyKind::Single => {
                Ok(Self { keys })
            }
            _ => Err(RuntimeError::structural("resource id must start with the root sentinel")),
        }
    }
}

impl From<ResourceId> for Vec<NodeKey> {
    fn from(id: ResourceId) -> Self {
        id.keys
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for key in self.segments() {
            write!(f, "/{}", key)?;
        }
        Ok(())
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Builder for a [`ResourceId`]
#[derive(Debug, Clone)]
pub struct ResourceIdBuilder {
    keys: Vec<NodeKey>,
}

impl Default for ResourceIdBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceIdBuilder {
    /// Builder positioned at the root sentinel
    pub fn new() -> Self {
        Self {
            keys: vec![NodeKey::root()],
        }
    }

    /// Append a single-instance node or leaf
    pub fn add_branch_point(
        &mut self,
        name: impl Into<String>,
        namespace: Option<String>,
    ) -> &mut Self {
        self.keys.push(NodeKey::single(SchemaId::new(name, namespace)));
        self
    }

    /// Append a list instance with its complete, ordered key
    pub fn add_list(
        &mut self,
        name: impl Into<String>,
        namespace: Option<String>,
        key_leafs: Vec<KeyLeaf>,
    ) -> &mut Self {
        self.keys.push(NodeKey::list(SchemaId::new(name, namespace), key_leafs));
        self
    }

    /// Append a leaf-list entry
    pub fn add_leaf_list(
        &mut self,
        name: impl Into<String>,
        namespace: Option<String>,
        value: LeafValue,
    ) -> &mut Self {
        self.keys.push(NodeKey::leaf_list(SchemaId::new(name, namespace), value));
        self
    }

    /// Append a prepared key
    pub fn add_key(&mut self, key: NodeKey) -> &mut Self {
        self.keys.push(key);
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn build(&self) -> ResourceId {
        ResourceId {
            keys: self.keys.clone(),
        }
    }
}

/// Schema-aware resource id construction
///
/// Resolves each appended name against the registered schema so callers
/// (text decoders, mostly) only supply names, optional namespaces and raw
/// values. List key values are given comma-separated in declared key order.
#[derive(Debug)]
pub struct ResourceIdCursor<'r> {
    registry: &'r YangModelRegistry,
    builder: ResourceIdBuilder,
    current: Option<SchemaNodeRef<'r>>,
}

impl<'r> ResourceIdCursor<'r> {
    /// Cursor at the schema root
    pub fn new(registry: &'r YangModelRegistry) -> Self {
        Self {
            registry,
            builder: ResourceIdBuilder::new(),
            current: None,
        }
    }

    /// Cursor positioned at the node addressed by `id`
    pub fn from_resource_id(registry: &'r YangModelRegistry, id: &ResourceId) -> Result<Self> {
        let current = registry.resolve_resource_id(id)?;
        Ok(Self {
            registry,
            builder: id.copy_builder(),
            current,
        })
    }

    /// Schema node the cursor is positioned at, `None` at the root
    pub fn schema(&self) -> Option<SchemaNodeRef<'r>> {
        self.current
    }

    /// Append the child `name` of the current node
    pub fn add_to_resource_id(
        &mut self,
        name: &str,
        namespace: Option<&str>,
        value: Option<&str>,
    ) -> Result<&mut Self> {
        if let Some(current) = self.current {
            if current.kind().is_leaf_like() {
                return Err(RuntimeError::structural(format!(
                    "cannot address '{}' below {} '{}'",
                    name,
                    current.kind(),
                    current.name()
                )));
            }
        }

        let inherited = self.current.and_then(|c| c.namespace());
        let child = self
            .registry
            .resolve_preferring(self.current, name, namespace, inherited)
            .ok_or_else(|| {
                RuntimeError::resolution(format!(
                    "no schema node '{}' at {}",
                    name, self.builder.build()
                ))
            })?
            .node;
        let id = child.schema_id().clone();

        match (child.kind(), value) {
            (SchemaNodeKind::List, Some(raw)) => {
                let values: Vec<&str> = raw.split(',').map(str::trim).collect();
                if values.len() != child.keys().len() {
                    return Err(RuntimeError::structural(format!(
                        "list '{}' has {} keys but {} values were given",
                        child.name(),
                        child.keys().len(),
                        values.len()
                    )));
                }
                let mut key_leafs = Vec::with_capacity(values.len());
                for (key, raw) in child.keys().iter().zip(values) {
                    let key_id = child
                        .child(key)
                        .map(|leaf| leaf.schema_id().clone())
                        .unwrap_or_else(|| {
                            SchemaId::new(key.clone(), id.namespace().map(str::to_string))
                        });
                    key_leafs.push(KeyLeaf::new(key_id, LeafValue::String(raw.to_string())));
                }
                self.builder.add_key(NodeKey::list(id, key_leafs));
            }
            (SchemaNodeKind::List, None) => {
                return Err(RuntimeError::structural(format!(
                    "list '{}' must be addressed with its key values",
                    child.name()
                )));
            }
            (SchemaNodeKind::LeafList, Some(raw)) => {
                self.builder.add_key(NodeKey::leaf_list(id, LeafValue::String(raw.to_string())));
            }
            (SchemaNodeKind::LeafList, None) | (SchemaNodeKind::Leaf, None) => {
                self.builder.add_key(NodeKey::single(id));
            }
            (kind, Some(_)) => {
                return Err(RuntimeError::structural(format!(
                    "a value cannot be given for {} '{}'",
                    kind,
                    child.name()
                )));
            }
            (_, None) => {
                self.builder.add_key(NodeKey::single(id));
            }
        }

        self.current = Some(child);
        Ok(self)
    }

    pub fn build(&self) -> ResourceId {
        self.builder.build()
    }
}

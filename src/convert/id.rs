//! Id Converter
//!
//! Forward: [`ModelObjectId`] to [`ResourceId`] plus the schema node the id
//! ends at. The first segment is located through the class index and its
//! data ancestors (for example `rpc` and `input`) are emitted ahead of it.
//! Later segments are located below the previous one, transparently through
//! augments and choice/case.
//!
//! Reverse: each resource id key becomes the class of its schema node. List
//! keys are rebuilt through the key descriptor, setting each key leaf by name.
//! Rpc nodes carry no class and produce no segment.

use tracing::trace;

use super::leaf_identifier;
use crate::data::{KeyLeaf, NodeKeyKind, ResourceId, ResourceIdBuilder};
use crate::error::{Result, RuntimeError};
use crate::model::{AtomicPath, LeafIdentifier, ModelKey, ModelObjectId, ModelObjectIdBuilder};
use crate::registry::YangModelRegistry;
use crate::schema::{SchemaNodeKind, SchemaNodeRef};

/// Converter between object-graph and schema addressing
#[derive(Debug, Clone, Copy)]
pub struct IdConverter<'r> {
    registry: &'r YangModelRegistry,
}

impl<'r> IdConverter<'r> {
    pub fn new(registry: &'r YangModelRegistry) -> Self {
        Self { registry }
    }

    // =========================================================================
    // ModelObjectId -> ResourceId
    // =========================================================================

    /// Convert an object id; the schema node is `None` for the root
    pub fn to_resource_id(
        &self,
        id: &ModelObjectId,
    ) -> Result<(ResourceId, Option<SchemaNodeRef<'r>>)> {
        let mut builder = ResourceId::builder();
        let mut current: Option<SchemaNodeRef<'r>> = None;

        for (index, path) in id.paths().iter().enumerate() {
            if path.is_leaf() && index + 1 != id.len() {
                return Err(RuntimeError::structural(format!(
                    "leaf segment {} must be last in {}",
                    path, id
                )));
            }

            let node = match current {
                None => self.locate_first(path)?,
                Some(parent) => self.locate_below(parent, path)?,
            };

            if current.is_none() {
                for ancestor in data_ancestors(node) {
                    emit_ancestor(&mut builder, ancestor)?;
                }
            }
            emit(&mut builder, node, path)?;
            current = Some(node);
        }

        let rid = builder.build();
        trace!(from = %id, to = %rid, "converted model object id");
        Ok((rid, current))
    }

    fn class_node(&self, class_name: &str) -> Result<SchemaNodeRef<'r>> {
        self.registry
            .get_for_reg_class_name(class_name)
            .ok_or_else(|| {
                RuntimeError::resolution(format!("no schema node for class '{}'", class_name))
            })
    }

    fn locate_first(&self, path: &AtomicPath) -> Result<SchemaNodeRef<'r>> {
        match path {
            AtomicPath::SingleInstanceNode { class_name }
            | AtomicPath::MultiInstanceNode { class_name, .. } => {
                let node = self.class_node(class_name)?;
                let not_data =
                    matches!(node.kind(), SchemaNodeKind::Augment | SchemaNodeKind::Module);
                if node.kind().is_transparent() || not_data {
                    return Err(RuntimeError::resolution(format!(
                        "class '{}' is bound to {} '{}', which is not a data node",
                        class_name,
                        node.kind(),
                        node.name()
                    )));
                }
                Ok(node)
            }
            AtomicPath::SingleInstanceLeaf(leaf) | AtomicPath::MultiInstanceLeaf { leaf, .. } => {
                let owner = self.class_node(&leaf.owner)?;
                owner
                    .find_data_child(&leaf.name, None)
                    .map(|found| found.node)
                    .ok_or_else(|| {
                        RuntimeError::resolution(format!(
                            "class '{}' has no leaf '{}'",
                            leaf.owner, leaf.name
                        ))
                    })
            }
        }
    }

    fn locate_below(
        &self,
        parent: SchemaNodeRef<'r>,
        path: &AtomicPath,
    ) -> Result<SchemaNodeRef<'r>> {
        let (name, namespace) = match path {
            AtomicPath::SingleInstanceNode { class_name }
            | AtomicPath::MultiInstanceNode { class_name, .. } => {
                let node = self.class_node(class_name)?;
                (node.name(), node.namespace())
            }
            AtomicPath::SingleInstanceLeaf(leaf) | AtomicPath::MultiInstanceLeaf { leaf, .. } => {
                (leaf.name.as_str(), None)
            }
        };

        let found = self
            .registry
            .resolve_preferring(Some(parent), name, namespace, parent.namespace())
            .ok_or_else(|| {
                RuntimeError::resolution(format!("no child '{}' below {}", name, parent.path()))
            })?
            .node;

        if let AtomicPath::SingleInstanceNode { class_name }
        | AtomicPath::MultiInstanceNode { class_name, .. } = path
        {
            if found.class_name() != Some(class_name.as_str()) {
                return Err(RuntimeError::resolution(format!(
                    "class '{}' is not a child of {}",
                    class_name,
                    parent.path()
                )));
            }
        }
        Ok(found)
    }

    // =========================================================================
    // ResourceId -> ModelObjectId
    // =========================================================================

    /// Convert a resource id into the object id of the same location
    pub fn to_model_object_id(&self, id: &ResourceId) -> Result<ModelObjectId> {
        let mut builder = ModelObjectId::builder();
        let mut current: Option<SchemaNodeRef<'r>> = None;

        for key in id.segments() {
            let inherited = current.and_then(|c| c.namespace());
            let node = self
                .registry
                .resolve_preferring(current, key.name(), key.namespace(), inherited)
                .ok_or_else(|| {
                    RuntimeError::resolution(format!("no schema node for '{}' in {}", key, id))
                })?
                .node;

            match (node.kind(), key.kind()) {
                (SchemaNodeKind::Rpc, _) => {}
                (SchemaNodeKind::Leaf, _) | (SchemaNodeKind::LeafList, NodeKeyKind::Single) => {
                    builder.add_leaf(leaf_identifier(node)?)?;
                }
                (SchemaNodeKind::LeafList, NodeKeyKind::LeafList(entry)) => {
                    builder.add_leaf_list(leaf_identifier(node)?, entry.value().clone())?;
                }
                (SchemaNodeKind::List, NodeKeyKind::List(list_key)) => {
                    let class = class_of(node)?;
                    let model_key = self.build_key(node, list_key.key_leafs())?;
                    builder.add_child_with_key(class, model_key)?;
                }
                (SchemaNodeKind::List, _) | (SchemaNodeKind::LeafList, NodeKeyKind::List(_)) => {
                    return Err(RuntimeError::structural(format!(
                        "key '{}' does not match {} '{}'",
                        key,
                        node.kind(),
                        node.name()
                    )));
                }
                _ => {
                    builder.add_child(class_of(node)?)?;
                }
            }
            current = Some(node);
        }

        Ok(builder.build())
    }

    fn build_key(
        &self,
        list: SchemaNodeRef<'_>,
        key_leafs: &[KeyLeaf],
    ) -> Result<Box<dyn ModelKey>> {
        let descriptor = self
            .registry
            .descriptor_for(list)
            .and_then(|d| d.key)
            .ok_or_else(|| {
                RuntimeError::resolution(format!("no key class bound for list {}", list.path()))
            })?;

        let mut key = (descriptor.new)();
        for leaf in key_leafs {
            let setter = descriptor.leaf(leaf.name()).ok_or_else(|| {
                RuntimeError::resolution(format!(
                    "key class '{}' has no leaf '{}'",
                    descriptor.class_name,
                    leaf.name()
                ))
            })?;
            (setter.set)(key.as_mut(), leaf.value())?;
        }
        Ok(key)
    }
}

fn class_of<'a>(node: SchemaNodeRef<'a>) -> Result<&'a str> {
    node.class_name()
        .ok_or_else(|| {
            RuntimeError::resolution(format!("no class bound to {} {}", node.kind(), node.path()))
        })
}

/// Data ancestors of `node`, outermost first
fn data_ancestors(node: SchemaNodeRef<'_>) -> Vec<SchemaNodeRef<'_>> {
    let mut ancestors = Vec::new();
    let mut current = node.data_parent();
    while let Some(parent) = current {
        ancestors.push(parent);
        current = parent.data_parent();
    }
    ancestors.reverse();
    ancestors
}

fn emit_ancestor(builder: &mut ResourceIdBuilder, node: SchemaNodeRef<'_>) -> Result<()> {
    if node.kind() == SchemaNodeKind::List {
        return Err(RuntimeError::structural(format!(
            "list {} above the first segment cannot be addressed without its key",
            node.path()
        )));
    }
    builder.add_branch_point(node.name(), node.namespace().map(str::to_string));
    Ok(())
}

fn emit(builder: &mut ResourceIdBuilder, node: SchemaNodeRef<'_>, path: &AtomicPath) -> Result<()> {
    let namespace = node.namespace().map(str::to_string);
    match path {
        AtomicPath::SingleInstanceNode { .. } => {
            if node.kind() == SchemaNodeKind::List {
                return Err(RuntimeError::structural(format!(
                    "list {} addressed without a key",
                    node.path()
                )));
            }
            builder.add_branch_point(node.name(), namespace);
        }
        AtomicPath::MultiInstanceNode { key, .. } => {
            if node.kind() != SchemaNodeKind::List {
                return Err(RuntimeError::structural(format!(
                    "{} {} addressed with a key",
                    node.kind(),
                    node.path()
                )));
            }
            let descriptor = key.descriptor();
            let mut key_leafs = Vec::with_capacity(node.keys().len());
            for name in node.keys() {
                let getter = descriptor.leaf(name).ok_or_else(|| {
                    RuntimeError::resolution(format!(
                        "key class '{}' has no leaf '{}'",
                        descriptor.class_name, name
                    ))
                })?;
                let value = (getter.get)(key.as_ref())?;
                let schema_id = node
                    .child(name)
                    .map(|leaf| leaf.schema_id().clone())
                    .ok_or_else(|| {
                        RuntimeError::resolution(format!(
                            "list {} has no key leaf '{}'",
                            node.path(), name
                        ))
                    })?;
                key_leafs.push(KeyLeaf::new(schema_id, value));
            }
            builder.add_list(node.name(), namespace, key_leafs);
        }
        AtomicPath::SingleInstanceLeaf(leaf) => {
            expect_leaf(node, leaf)?;
            builder.add_branch_point(node.name(), namespace);
        }
        AtomicPath::MultiInstanceLeaf { leaf, value } => {
            expect_leaf(node, leaf)?;
            if node.kind() != SchemaNodeKind::LeafList {
                return Err(RuntimeError::structural(format!(
                    "leaf {} addressed with a value",
                    node.path()
                )));
            }
            builder.add_leaf_list(node.name(), namespace, value.clone());
        }
    }
    Ok(())
}

fn expect_leaf(node: SchemaNodeRef<'_>, leaf: &LeafIdentifier) -> Result<()> {
    if node.kind().is_leaf_like() {
        Ok(())
    } else {
        Err(RuntimeError::resolution(format!(
            "{} resolved to {} {}",
            leaf,
            node.kind(),
            node.path()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaModel;

    fn registry() -> YangModelRegistry {
        let mut b = SchemaModel::builder("rpc");
        let m = b.module("ytb-rpc", "urn:rpc", None);
        b.set_class(m, "ytb_rpc::YtbRpc").unwrap();
        b.child(m, SchemaNodeKind::Leaf, "top-leaf").unwrap();
        let rpc = b.child(m, SchemaNodeKind::Rpc, "test-rpc").unwrap();
        let input = b.child(rpc, SchemaNodeKind::Input, "input").unwrap();
        b.set_class(input, "ytb_rpc::TestRpcInput").unwrap();
        let cont = b.child(input, SchemaNodeKind::Container, "test-container").unwrap();
        b.set_class(cont, "ytb_rpc::TestContainer").unwrap();
        b.child(cont, SchemaNodeKind::LeafList, "tag").unwrap();

        let mut registry = YangModelRegistry::new();
        registry.register_model(b.build().unwrap(), &[]).unwrap();
        registry
    }

    #[test]
    fn test_rpc_ancestors_are_emitted() {
        let registry = registry();
        let converter = IdConverter::new(&registry);

        let mut b = ModelObjectId::builder();
        b.add_child("ytb_rpc::TestContainer").unwrap();
        let (rid, node) = converter.to_resource_id(&b.build()).unwrap();

        assert_eq!(rid.to_string(), "/test-rpc/input/test-container");
        assert_eq!(node.unwrap().name(), "test-container");
        for key in rid.segments() {
            assert_eq!(key.namespace(), Some("urn:rpc"));
        }

        let back = converter.to_model_object_id(&rid).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(
            back.paths()[0],
            AtomicPath::SingleInstanceNode {
                class_name: "ytb_rpc::TestRpcInput".into()
            }
        );
    }

    #[test]
    fn test_leaf_segments() {
        let registry = registry();
        let converter = IdConverter::new(&registry);

        let mut b = ModelObjectId::builder();
        b.add_leaf(LeafIdentifier::new("ytb_rpc::YtbRpc", "top-leaf")).unwrap();
        let (rid, node) = converter.to_resource_id(&b.build()).unwrap();
        assert_eq!(rid.to_string(), "/top-leaf");
        assert_eq!(node.unwrap().kind(), SchemaNodeKind::Leaf);
        assert_eq!(converter.to_model_object_id(&rid).unwrap(), b.build());

        let mut b = ModelObjectId::builder();
        b.add_child("ytb_rpc::TestRpcInput")
            .unwrap()
            .add_child("ytb_rpc::TestContainer")
            .unwrap()
            .add_leaf_list(LeafIdentifier::new("ytb_rpc::TestContainer", "tag"), "x".into())
            .unwrap();
        let (rid, _) = converter.to_resource_id(&b.build()).unwrap();
        assert_eq!(rid.to_string(), "/test-rpc/input/test-container/tag[.=x]");
        assert_eq!(converter.to_model_object_id(&rid).unwrap(), b.build());
    }

    #[test]
    fn test_unknown_class_fails() {
        let registry = registry();
        let mut b = ModelObjectId::builder();
        b.add_child("ytb_rpc::Missing").unwrap();
        assert!(matches!(
            IdConverter::new(&registry).to_resource_id(&b.build()),
            Err(RuntimeError::SchemaResolution(_))
        ));
    }

    #[test]
    fn test_root_converts_to_root() {
        let registry = registry();
        let converter = IdConverter::new(&registry);
        let (rid, node) = converter.to_resource_id(&ModelObjectId::root()).unwrap();
        assert!(rid.is_root());
        assert!(node.is_none());
        assert!(converter.to_model_object_id(&rid).unwrap().is_root());
    }
}

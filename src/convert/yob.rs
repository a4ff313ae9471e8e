//! YANG Object Builder
//!
//! Rebuilds generated objects from a data tree. Each inner data node becomes
//! an instance of the class bound to its schema node. Children are routed to
//! the field that holds them:
//!
//! - a child declared under a case is stored on an instance of the case class,
//!   which is set as the value of the choice field on the parent
//! - a child contributed by an augment is stored on the augmentation instance
//!   of the augmenting class, attached to the parent's extensions
//!
//! Case and augmentation instances are created once per parent and receive
//! every child that belongs to them.

use tracing::{debug, trace};

use super::{leaf_identifier, IdConverter, ResourceData};
use crate::data::{DataNode, LeafValue};
use crate::error::{Result, RuntimeError};
use crate::model::{FieldAccess, InnerModelObject, LeafModelObject, ModelObject, ModelObjectData};
use crate::registry::YangModelRegistry;
use crate::schema::{DataChild, Layer, SchemaNodeKind, SchemaNodeRef};

/// A resolved child waiting to be stored; `layers` are still to be entered
struct Pending<'a, 'd> {
    layers: Vec<Layer<'a>>,
    schema: SchemaNodeRef<'a>,
    data: &'d DataNode,
}

/// Data tree to object graph converter
#[derive(Debug, Clone, Copy)]
pub struct YangObjectBuilder<'r> {
    registry: &'r YangModelRegistry,
}

impl<'r> YangObjectBuilder<'r> {
    pub fn new(registry: &'r YangModelRegistry) -> Self {
        Self { registry }
    }

    /// Convert data nodes under `data.resource_id` into objects
    ///
    /// When the resource id ends at the first data node itself, the nodes
    /// are read as children of the id's parent and the returned object id
    /// addresses that parent.
    pub fn build(&self, data: &ResourceData) -> Result<ModelObjectData> {
        let rooted_at_node = match (data.resource_id.last_key(), data.data_nodes.first()) {
            (Some(terminal), Some(first)) => terminal.schema_id() == first.key().schema_id(),
            _ => false,
        };
        let parent_id = if rooted_at_node {
            data.resource_id.parent().unwrap_or_else(|| data.resource_id.clone())
        } else {
            data.resource_id.clone()
        };

        let base = self.registry.resolve_resource_id(&parent_id)?;
        let id = IdConverter::new(self.registry).to_model_object_id(&parent_id)?;
        debug!(base = %parent_id, nodes = data.data_nodes.len(), "building model objects");

        let mut objects: Vec<ModelObject> = Vec::new();
        for node in &data.data_nodes {
            let schema = self.resolve(base, node)?.node;
            if schema.kind().is_leaf_like() {
                let value = leaf_value(node)?;
                let leaf = leaf_identifier(schema)?;
                match objects.last_mut() {
                    Some(ModelObject::Leaf(last))
                        if schema.kind() == SchemaNodeKind::LeafList && last.leaf == leaf =>
                    {
                        last.values.push(value);
                    }
                    _ => objects.push(ModelObject::Leaf(LeafModelObject::new(leaf, vec![value]))),
                }
            } else {
                objects.push(ModelObject::Inner(self.build_object(node, schema)?));
            }
        }

        Ok(ModelObjectData { id, objects })
    }

    fn resolve(&self, parent: Option<SchemaNodeRef<'r>>, node: &DataNode) -> Result<DataChild<'r>> {
        let key = node.key();
        self.registry
            .resolve_preferring(
                parent,
                key.name(),
                key.namespace(),
                parent.and_then(|p| p.namespace()),
            )
            .ok_or_else(|| {
                RuntimeError::resolution(format!(
                    "no schema node for '{}' under {}",
                    key.schema_id(),
                    parent.map_or_else(|| "the schema root".to_string(), |p| p.path())
                ))
            })
    }

    fn instantiate(&self, schema: SchemaNodeRef<'_>) -> Result<Box<dyn InnerModelObject>> {
        let descriptor = self
            .registry
            .descriptor_for(schema)
            .ok_or_else(|| {
                RuntimeError::resolution(format!(
                    "no runtime class bound to {} {}",
                    schema.kind(), schema.path()
                ))
            })?;
        Ok((descriptor.new)())
    }

    fn build_object(
        &self,
        node: &DataNode,
        schema: SchemaNodeRef<'r>,
    ) -> Result<Box<dyn InnerModelObject>> {
        if node.as_inner().is_none() {
            return Err(RuntimeError::structural(format!(
                "leaf data node '{}' given for {} {}",
                node.key(),
                schema.kind(),
                schema.path()
            )));
        }
        trace!(node = %node.key(), "build object");
        let mut object = self.instantiate(schema)?;

        if schema.kind() == SchemaNodeKind::Anydata {
            for child in node.children() {
                let payload = self.resolve(Some(schema), child)?.node;
                let payload_object = self.build_object(child, payload)?;
                object.extensions_mut().add_anydata(payload_object);
            }
            return Ok(object);
        }

        let mut pending = Vec::with_capacity(node.children().len());
        for child in node.children() {
            let found = self.resolve(Some(schema), child)?;
            pending.push(Pending {
                layers: found.layers,
                schema: found.node,
                data: child,
            });
        }
        self.fill(object.as_mut(), pending)?;
        Ok(object)
    }

    /// Store resolved children on `target`, creating case and augmentation
    /// instances for the layers in between
    fn fill(&self, target: &mut dyn InnerModelObject, pending: Vec<Pending<'r, '_>>) -> Result<()> {
        let mut groups: Vec<(Layer<'r>, Vec<Pending<'r, '_>>)> = Vec::new();
        for mut entry in pending {
            if entry.layers.is_empty() {
                self.assign(target, entry.schema, entry.data)?;
                continue;
            }
            let layer = entry.layers.remove(0);
            match groups.iter_mut().find(|(l, _)| *l == layer) {
                Some((_, members)) => members.push(entry),
                None => groups.push((layer, vec![entry])),
            }
        }

        for (layer, members) in groups {
            match layer {
                Layer::Augment(augment) => {
                    let mut augmentation = self.instantiate(augment)?;
                    self.fill(augmentation.as_mut(), members)?;
                    target.extensions_mut().add_augmentation(augmentation);
                }
                Layer::Case { choice, case } => {
                    let mut case_object = self.instantiate(case)?;
                    self.fill(case_object.as_mut(), members)?;
                    let descriptor = target.descriptor();
                    match descriptor.field(choice.name()).map(|f| f.access) {
                        Some(FieldAccess::Choice { set, .. }) => set(&mut *target, case_object)?,
                        _ => {
                            return Err(RuntimeError::resolution(format!(
                                "class '{}' has no choice field '{}'",
                                descriptor.class_name,
                                choice.name()
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn assign(
        &self,
        target: &mut dyn InnerModelObject,
        schema: SchemaNodeRef<'r>,
        data: &DataNode,
    ) -> Result<()> {
        let descriptor = target.descriptor();
        let field = descriptor.field(schema.name()).ok_or_else(|| {
            RuntimeError::resolution(format!(
                "class '{}' has no field for {} '{}'",
                descriptor.class_name,
                schema.kind(),
                schema.name()
            ))
        })?;

        match (schema.kind(), field.access) {
            (SchemaNodeKind::Leaf, FieldAccess::Leaf { set, .. }) => {
                set(&mut *target, &leaf_value(data)?)?
            }
            (SchemaNodeKind::LeafList, FieldAccess::LeafList { push, .. }) => {
                push(&mut *target, &leaf_value(data)?)?
            }
            (SchemaNodeKind::List, FieldAccess::List { push, .. }) => {
                let entry = self.build_object(data, schema)?;
                push(&mut *target, entry)?
            }
            (
                SchemaNodeKind::Container
                | SchemaNodeKind::Anydata
                | SchemaNodeKind::Input
                | SchemaNodeKind::Output
                | SchemaNodeKind::Notification,
                FieldAccess::Container { set, .. },
            ) => {
                let child = self.build_object(data, schema)?;
                set(&mut *target, child)?
            }
            (kind, access) => {
                return Err(RuntimeError::resolution(format!(
                    "field '{}' of class '{}' is a {} accessor but the schema declares a {}",
                    field.name,
                    descriptor.class_name,
                    access.kind_name(),
                    kind
                )));
            }
        }
        Ok(())
    }
}

fn leaf_value(node: &DataNode) -> Result<LeafValue> {
    node.value()
        .cloned()
        .ok_or_else(|| {
            RuntimeError::structural(format!("inner data node '{}' given for a leaf", node.key()))
        })
}

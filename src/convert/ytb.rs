//! YANG Tree Builder
//!
//! Walks generated objects depth-first, guided by the schema, and emits one
//! data node per populated field:
//!
//! - children are visited in schema declaration order through the object's
//!   field descriptors
//! - choice fields contribute the children of the selected case directly
//!   under the choice's parent, never a node for the choice or case
//! - augmentations follow the native children, in the target's augment order,
//!   each found on the object by the augmenting class
//! - anydata payloads are placed under their holder using the registered
//!   payload schemas

use tracing::{debug, trace};

use super::{IdConverter, ResourceData};
use crate::data::DataNodeBuilder;
use crate::error::{Result, RuntimeError};
use crate::model::{FieldAccess, InnerModelObject, LeafModelObject, ModelObject, ModelObjectData};
use crate::registry::YangModelRegistry;
use crate::schema::{SchemaNodeKind, SchemaNodeRef};

/// Object graph to data tree converter
#[derive(Debug, Clone, Copy)]
pub struct YangTreeBuilder<'r> {
    registry: &'r YangModelRegistry,
}

impl<'r> YangTreeBuilder<'r> {
    pub fn new(registry: &'r YangModelRegistry) -> Self {
        Self { registry }
    }

    /// Convert objects positioned under `data.id` into data nodes under the
    /// equivalent resource id
    pub fn build(&self, data: &ModelObjectData) -> Result<ResourceData> {
        let (resource_id, base) = IdConverter::new(self.registry).to_resource_id(&data.id)?;
        debug!(base = %resource_id, objects = data.objects.len(), "building data tree");

        if let Some(node) = base {
            if node.kind().is_leaf_like() {
                if data.objects.is_empty() {
                    return Ok(ResourceData::new(resource_id));
                }
                return Err(RuntimeError::structural(format!(
                    "objects cannot be placed below {} {}",
                    node.kind(),
                    node.path()
                )));
            }
        }

        let mut builder = DataNodeBuilder::at(self.registry, base);
        for object in &data.objects {
            match object {
                ModelObject::Inner(object) => self.emit_top(&mut builder, base, object.as_ref())?,
                ModelObject::Leaf(leaf) => self.emit_leaf_object(&mut builder, base, leaf)?,
            }
        }

        Ok(ResourceData::with_nodes(resource_id, builder.build()?))
    }

    fn class_node(&self, object: &dyn InnerModelObject) -> Result<SchemaNodeRef<'r>> {
        self.registry
            .get_for_reg_class_name(object.class_name())
            .ok_or_else(|| {
                RuntimeError::resolution(format!(
                    "no schema node for class '{}'",
                    object.class_name()
                ))
            })
    }

    fn emit_top(
        &self,
        builder: &mut DataNodeBuilder<'r>,
        base: Option<SchemaNodeRef<'r>>,
        object: &dyn InnerModelObject,
    ) -> Result<()> {
        let schema = self.class_node(object)?;
        if schema.kind() == SchemaNodeKind::Module {
            // top-level leaves travel as leaf objects owned by the module class
            return Err(RuntimeError::structural(format!(
                "module class '{}' has no data node; pass its leaves as leaf objects",
                object.class_name()
            )));
        }
        let under_anydata = base.map_or(false, |b| b.kind() == SchemaNodeKind::Anydata);
        if schema.data_parent() != base && !under_anydata {
            return Err(RuntimeError::structural(format!(
                "class '{}' does not belong under {}",
                object.class_name(),
                base.map_or_else(|| "the schema root".to_string(), |b| b.path())
            )));
        }
        self.emit_object(builder, object, schema)
    }

    fn emit_leaf_object(
        &self,
        builder: &mut DataNodeBuilder<'r>,
        base: Option<SchemaNodeRef<'r>>,
        leaf: &LeafModelObject,
    ) -> Result<()> {
        let owner = self
            .registry
            .get_for_reg_class_name(&leaf.leaf.owner)
            .ok_or_else(|| {
                RuntimeError::resolution(format!("no schema node for class '{}'", leaf.leaf.owner))
            })?;
        let schema = owner
            .find_data_child(&leaf.leaf.name, None)
            .map(|found| found.node)
            .filter(|node| node.kind().is_leaf_like())
            .ok_or_else(|| RuntimeError::resolution(format!("no leaf for {}", leaf.leaf)))?;
        if schema.data_parent() != base {
            return Err(RuntimeError::structural(format!(
                "leaf {} does not belong under {}",
                leaf.leaf,
                base.map_or_else(|| "the schema root".to_string(), |b| b.path())
            )));
        }
        if schema.kind() == SchemaNodeKind::Leaf && leaf.values.len() != 1 {
            return Err(RuntimeError::structural(format!(
                "leaf {} carries {} values",
                leaf.leaf,
                leaf.values.len()
            )));
        }
        for value in &leaf.values {
            builder.enter(schema, Some(value.clone()))?.exit_data_node()?;
        }
        Ok(())
    }

    fn emit_object(
        &self,
        builder: &mut DataNodeBuilder<'r>,
        object: &dyn InnerModelObject,
        schema: SchemaNodeRef<'r>,
    ) -> Result<()> {
        trace!(class = object.class_name(), node = %schema.name(), "emit object");
        builder.enter(schema, None)?;
        self.emit_children(builder, object, schema)?;
        if schema.kind() == SchemaNodeKind::Anydata {
            self.emit_anydata(builder, object, schema)?;
        }
        builder.exit_data_node()?;
        Ok(())
    }

    fn emit_anydata(
        &self,
        builder: &mut DataNodeBuilder<'r>,
        holder: &dyn InnerModelObject,
        schema: SchemaNodeRef<'r>,
    ) -> Result<()> {
        let holder_class = schema
            .class_name()
            .ok_or_else(|| {
                RuntimeError::resolution(format!("no class bound to anydata {}", schema.path()))
            })?;
        for payload in holder.extensions().anydata() {
            let payload_schema = self
                .registry
                .anydata_payload(holder_class, payload.class_name())
                .ok_or_else(|| {
                    RuntimeError::resolution(format!(
                        "class '{}' is not registered as a payload of '{}'",
                        payload.class_name(),
                        holder_class
                    ))
                })?;
            self.emit_object(builder, payload, payload_schema)?;
        }
        Ok(())
    }

    /// Emit the fields of `object` described by the children of `schema`,
    /// then its augmentations
    fn emit_children(
        &self,
        builder: &mut DataNodeBuilder<'r>,
        object: &dyn InnerModelObject,
        schema: SchemaNodeRef<'r>,
    ) -> Result<()> {
        let descriptor = object.descriptor();

        for child in schema.children() {
            if child.kind() == SchemaNodeKind::Augment {
                continue;
            }
            let field = descriptor.field(child.name()).ok_or_else(|| {
                RuntimeError::resolution(format!(
                    "class '{}' has no field for {} '{}'",
                    descriptor.class_name,
                    child.kind(),
                    child.name()
                ))
            })?;

            match (child.kind(), field.access) {
                (SchemaNodeKind::Leaf, FieldAccess::Leaf { get, .. }) => {
                    if let Some(value) = get(object)? {
                        builder.enter(child, Some(value))?.exit_data_node()?;
                    }
                }
                (SchemaNodeKind::LeafList, FieldAccess::LeafList { get, .. }) => {
                    for value in get(object)? {
                        builder.enter(child, Some(value))?.exit_data_node()?;
                    }
                }
                (SchemaNodeKind::List, FieldAccess::List { get, .. }) => {
                    for entry in get(object)? {
                        self.emit_object(builder, entry, child)?;
                    }
                }
                (SchemaNodeKind::Choice, FieldAccess::Choice { get, .. }) => {
                    if let Some(case_object) = get(object)? {
                        let case = self.class_node(case_object)?;
                        if case.kind() != SchemaNodeKind::Case || !case.is_case_of(child) {
                            return Err(RuntimeError::resolution(format!(
                                "class '{}' is not a case of choice {}",
                                case_object.class_name(),
                                child.path()
                            )));
                        }
                        self.emit_children(builder, case_object, case)?;
                    }
                }
                (
                    SchemaNodeKind::Container
                    | SchemaNodeKind::Anydata
                    | SchemaNodeKind::Input
                    | SchemaNodeKind::Output
                    | SchemaNodeKind::Notification,
                    FieldAccess::Container { get, .. },
                ) => {
                    if let Some(child_object) = get(object)? {
                        self.emit_object(builder, child_object, child)?;
                    }
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
        }

        for augment in schema.augments() {
            let Some(class) = augment.class_name() else {
                trace!(augment = %augment.name(), "augment without class skipped");
                continue;
            };
            if let Some(augmentation) = object.extensions().augmentation(class) {
                self.emit_children(builder, augmentation, augment)?;
            }
        }
        Ok(())
    }
}

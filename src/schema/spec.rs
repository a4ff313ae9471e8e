//! Schema Metadata Blob
//!
//! Serde form of a compiled model, as emitted by the external compiler.
//!
//! ```json
//! {
//!   "id": "ytb-augment",
//!   "modules": [
//!     {
//!       "name": "ytb-aug",
//!       "namespace": "urn:ytb-aug",
//!       "revision": "2016-08-26",
//!       "children": [
//!         { "kind": "container", "name": "cont1", "class": "ytb_aug::Cont1" }
//!       ],
//!       "augments": [
//!         { "target": "/ytb-aug:cont1", "children": [ ... ] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{NodeId, Revision, SchemaModel, SchemaModelBuilder, SchemaNodeKind};
use crate::error::{Result, RuntimeError};

/// A compiled model in serialized form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Identifier of the compiled set
    pub id: String,
    pub modules: Vec<ModuleSpec>,
}

/// One module of a [`ModelSpec`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<Revision>,
    /// Generated class holding the module's top-level leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
    #[serde(default)]
    pub augments: Vec<AugmentSpec>,
}

/// A schema node in serialized form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: SchemaNodeKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    #[serde(default = "default_true")]
    pub config: bool,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// An augment in serialized form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugmentSpec {
    /// Absolute schema path of the target, prefixed by module names
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

fn default_true() -> bool {
    true
}

impl ModelSpec {
    /// Parse a metadata blob
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the blob
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Compile a [`ModelSpec`] into a [`SchemaModel`]
pub(crate) fn compile(spec: &ModelSpec) -> Result<SchemaModel> {
    let mut builder = SchemaModelBuilder::new(spec.id.clone());

    let mut pending: Vec<(NodeId, &AugmentSpec)> = Vec::new();
    for module in &spec.modules {
        let id = builder.module(module.name.clone(), module.namespace.clone(), module.revision);
        if let Some(class) = &module.class {
            builder.set_class(id, class.clone())?;
        }
        for child in &module.children {
            add_node(&mut builder, id, child)?;
        }
        pending.extend(module.augments.iter().map(|a| (id, a)));
    }

    // augments may target nodes contributed by other augments
    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();
        for (module, augment) in pending {
            match builder.resolve_path(&augment.target) {
                Ok(target) => {
                    let id = builder.augment(module, target)?;
                    if let Some(class) = &augment.class {
                        builder.set_class(id, class.clone())?;
                    }
                    for child in &augment.children {
                        add_node(&mut builder, id, child)?;
                    }
                }
                Err(_) => deferred.push((module, augment)),
            }
        }
        if deferred.len() == before {
            let targets: Vec<&str> = deferred.iter().map(|(_, a)| a.target.as_str()).collect();
            return Err(RuntimeError::invalid_model(format!(
                "unresolved augment targets: {}",
                targets.join(", ")
            )));
        }
        pending = deferred;
    }

    let model = builder.build()?;
    trace!(model = %model.id(), nodes = model.len(), "compiled schema model from spec");
    Ok(model)
}

fn add_node(builder: &mut SchemaModelBuilder, parent: NodeId, spec: &NodeSpec) -> Result<()> {
    let id = builder.child(parent, spec.kind, spec.name.clone())?;
    if let Some(ns) = &spec.namespace {
        builder.set_namespace(id, ns.clone())?;
    }
    if let Some(class) = &spec.class {
        builder.set_class(id, class.clone())?;
    }
    if !spec.keys.is_empty() {
        let keys: Vec<&str> = spec.keys.iter().map(String::as_str).collect();
        builder.set_keys(id, &keys)?;
    }
    if !spec.config {
        builder.set_config(id, false)?;
    }
    for child in &spec.children {
        add_node(builder, id, child)?;
    }
    Ok(())
}

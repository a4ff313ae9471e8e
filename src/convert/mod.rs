//! Object ⇄ Tree Conversion
//!
//! - [`IdConverter`] translates between [`ModelObjectId`] and [`ResourceId`]
//! - [`YangTreeBuilder`] (YTB) turns generated objects into a data tree
//! - [`YangObjectBuilder`] (YOB) turns a data tree back into objects
//!
//! All three borrow the registry for the duration of one call and fail fast:
//! an unresolvable class, name or field aborts the conversion without a
//! partial result.
//!
//! [`ModelObjectId`]: crate::model::ModelObjectId

pub mod id;
pub mod yob;
pub mod ytb;

pub use id::IdConverter;
pub use yob::YangObjectBuilder;
pub use ytb::YangTreeBuilder;

use serde::{Deserialize, Serialize};

use crate::data::{DataNode, ResourceId};
use crate::error::{Result, RuntimeError};
use crate::model::LeafIdentifier;
use crate::schema::SchemaNodeRef;

/// Sibling data nodes positioned under a resource id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    pub resource_id: ResourceId,
    pub data_nodes: Vec<DataNode>,
}

impl ResourceData {
    pub fn new(resource_id: ResourceId) -> Self {
        Self {
            resource_id,
            data_nodes: Vec::new(),
        }
    }

    pub fn with_nodes(resource_id: ResourceId, data_nodes: Vec<DataNode>) -> Self {
        Self {
            resource_id,
            data_nodes,
        }
    }
}

/// Identifier of a leaf by the nearest enclosing node that has a class
///
/// Cases, augments and modules count as enclosing nodes.
pub(crate) fn leaf_identifier(leaf: SchemaNodeRef<'_>) -> Result<LeafIdentifier> {
    let mut current = leaf.parent();
    while let Some(node) = current {
        if let Some(class) = node.class_name() {
            return Ok(LeafIdentifier::new(class, leaf.name()));
        }
        current = node.parent();
    }
    Err(RuntimeError::resolution(format!(
        "no class encloses leaf {}",
        leaf.path()
    )))
}

//! JSON tree codec
//!
//! Encodes a [`CompositeData`] as its serde JSON form. Decoding checks that
//! the resource id resolves against the registered schema.

use tracing::trace;

use super::{CompositeData, CompositeStream, SerializerContext, YangSerializer};
use crate::error::Result;

/// Format name of [`JsonTreeSerializer`]
pub const JSON_TREE_FORMAT: &str = "json-tree";

/// Built-in codec writing data trees as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTreeSerializer;

impl YangSerializer for JsonTreeSerializer {
    fn format(&self) -> &str {
        JSON_TREE_FORMAT
    }

    fn encode(
        &self,
        data: &CompositeData,
        context: &SerializerContext<'_>,
    ) -> Result<CompositeStream> {
        context.registry.resolve_resource_id(&data.resource_data.resource_id)?;
        let bytes = if context.pretty {
            serde_json::to_vec_pretty(data)?
        } else {
            serde_json::to_vec(data)?
        };
        trace!(bytes = bytes.len(), "encoded json tree");
        Ok(CompositeStream {
            resource_id: Some(data.resource_data.resource_id.to_string()),
            bytes,
        })
    }

    fn decode(
        &self,
        stream: &CompositeStream,
        context: &SerializerContext<'_>,
    ) -> Result<CompositeData> {
        let data: CompositeData = serde_json::from_slice(&stream.bytes)?;
        context.registry.resolve_resource_id(&data.resource_data.resource_id)?;
        Ok(data)
    }
}

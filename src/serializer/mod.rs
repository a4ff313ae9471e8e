//! Serializer Boundary
//!
//! Wire codecs plug in through [`YangSerializer`] and are looked up by format
//! name in a [`SerializerRegistry`]. Encoders receive data trees plus
//! per-node annotations; decoders produce them. Both see the schema registry
//! through a [`SerializerContext`].

pub mod json;

pub use json::JsonTreeSerializer;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::ResourceData;
use crate::data::ResourceId;
use crate::error::{Result, RuntimeError};
use crate::registry::YangModelRegistry;

/// One annotation attached to a data node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub value: String,
}

impl Annotation {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Annotations of the node addressed by `resource_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedNodeInfo {
    pub resource_id: ResourceId,
    pub annotations: Vec<Annotation>,
}

/// Data trees and their annotations, as handed to and from codecs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeData {
    pub resource_data: ResourceData,
    #[serde(default)]
    pub annotations: Vec<AnnotatedNodeInfo>,
}

impl CompositeData {
    pub fn new(resource_data: ResourceData) -> Self {
        Self {
            resource_data,
            annotations: Vec::new(),
        }
    }
}

/// Encoded form: the textual resource id plus the payload bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeStream {
    pub resource_id: Option<String>,
    pub bytes: Vec<u8>,
}

/// What a codec may consult while running
#[derive(Debug, Clone, Copy)]
pub struct SerializerContext<'r> {
    pub registry: &'r YangModelRegistry,
    pub pretty: bool,
}

/// A wire codec for data trees
pub trait YangSerializer: Send + Sync {
    /// Format name the codec is registered under
    fn format(&self) -> &str;

    fn encode(
        &self,
        data: &CompositeData,
        context: &SerializerContext<'_>,
    ) -> Result<CompositeStream>;

    fn decode(
        &self,
        stream: &CompositeStream,
        context: &SerializerContext<'_>,
    ) -> Result<CompositeData>;
}

/// Codecs keyed by format name
#[derive(Default, Clone)]
pub struct SerializerRegistry {
    serializers: HashMap<String, Arc<dyn YangSerializer>>,
}

impl SerializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in codecs
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonTreeSerializer));
        registry
    }

    /// Register a codec, replacing any codec of the same format
    pub fn register(
        &mut self,
        serializer: Arc<dyn YangSerializer>,
    ) -> Option<Arc<dyn YangSerializer>> {
        let format = serializer.format().to_string();
        debug!(format = %format, "registered serializer");
        self.serializers.insert(format, serializer)
    }

    pub fn unregister(&mut self, format: &str) -> Option<Arc<dyn YangSerializer>> {
        self.serializers.remove(format)
    }

    pub fn get(&self, format: &str) -> Result<Arc<dyn YangSerializer>> {
        self.serializers
            .get(format)
            .cloned()
            .ok_or_else(|| RuntimeError::UnsupportedFormat(format.to_string()))
    }

    /// Registered format names, sorted
    pub fn formats(&self) -> Vec<&str> {
        let mut formats: Vec<&str> = self.serializers.keys().map(String::as_str).collect();
        formats.sort_unstable();
        formats
    }
}

impl std::fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

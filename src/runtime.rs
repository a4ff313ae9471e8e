//! Runtime Facade
//!
//! Bundles the schema registry, the serializer registry and the loaded
//! configuration. The registry sits behind a read-write lock so models can be
//! registered while conversions run on other threads.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::RuntimeConfig;
use crate::convert::{ResourceData, YangObjectBuilder, YangTreeBuilder};
use crate::error::Result;
use crate::model::{ModelObjectData, TypeDescriptor};
use crate::registry::YangModelRegistry;
use crate::schema::SchemaModel;
use crate::serializer::{
    CompositeData, CompositeStream, SerializerContext, SerializerRegistry, YangSerializer,
};

/// Entry point for applications
#[derive(Debug, Clone)]
pub struct YangRuntime {
    registry: Arc<RwLock<YangModelRegistry>>,
    serializers: Arc<RwLock<SerializerRegistry>>,
    config: RuntimeConfig,
}

impl Default for YangRuntime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl YangRuntime {
    /// Runtime with the built-in serializers
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            registry: Arc::new(RwLock::new(YangModelRegistry::with_config(
                config.registry.clone(),
            ))),
            serializers: Arc::new(RwLock::new(SerializerRegistry::with_defaults())),
            config,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Shared handle to the schema registry
    pub fn registry(&self) -> Arc<RwLock<YangModelRegistry>> {
        Arc::clone(&self.registry)
    }

    pub fn register_model(
        &self,
        model: SchemaModel,
        bindings: &[&'static TypeDescriptor],
    ) -> Result<()> {
        self.registry.write().register_model(model, bindings)
    }

    /// Remove a model; returns whether it was registered
    pub fn unregister_model(&self, model_id: &str) -> bool {
        self.registry.write().unregister_model(model_id).is_some()
    }

    pub fn register_anydata_schema(&self, holder_class: &str, payload_class: &str) -> Result<()> {
        self.registry.write().register_anydata_schema(holder_class, payload_class)
    }

    pub fn register_serializer(&self, serializer: Arc<dyn YangSerializer>) {
        self.serializers.write().register(serializer);
    }

    /// Objects to data tree (YTB)
    pub fn to_resource_data(&self, data: &ModelObjectData) -> Result<ResourceData> {
        let registry = self.registry.read();
        YangTreeBuilder::new(&registry).build(data)
    }

    /// Data tree to objects (YOB)
    pub fn to_model_object_data(&self, data: &ResourceData) -> Result<ModelObjectData> {
        let registry = self.registry.read();
        YangObjectBuilder::new(&registry).build(data)
    }

    /// Encode with `format`, or the configured default format
    pub fn encode(&self, data: &CompositeData, format: Option<&str>) -> Result<CompositeStream> {
        let format = format.unwrap_or(self.config.serializer.default_format.as_str());
        let serializer = self.serializers.read().get(format)?;
        let registry = self.registry.read();
        let context = SerializerContext {
            registry: &registry,
            pretty: self.config.serializer.pretty,
        };
        debug!(format, "encoding composite data");
        serializer.encode(data, &context)
    }

    /// Decode with `format`, or the configured default format
    pub fn decode(&self, stream: &CompositeStream, format: Option<&str>) -> Result<CompositeData> {
        let format = format.unwrap_or(self.config.serializer.default_format.as_str());
        let serializer = self.serializers.read().get(format)?;
        let registry = self.registry.read();
        let context = SerializerContext {
            registry: &registry,
            pretty: self.config.serializer.pretty,
        };
        debug!(format, "decoding composite stream");
        serializer.decode(stream, &context)
    }
}

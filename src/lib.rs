//! YANG Runtime
//!
//! Bidirectional mapping between schema-addressed YANG data trees and
//! instances of generated, strongly-typed model classes.
//!
//! ## Features
//!
//! - **Multi-revision registry**: several revisions of a module coexist;
//!   lookups by name, `name@revision`, namespace or generated class
//! - **Generic data trees**: [`DataNode`] trees built with a stack-disciplined,
//!   schema-aware [`DataNodeBuilder`]
//! - **Two addressing schemes**: [`ResourceId`] in schema terms and
//!   [`ModelObjectId`] in class terms, converted by [`IdConverter`]
//! - **Object ⇄ tree conversion**: [`YangTreeBuilder`] (YTB) and
//!   [`YangObjectBuilder`] (YOB), transparent to choice/case with augments
//!   spliced in from foreign modules
//!
//! ## Architecture
//!
//! ```text
//! SchemaModel ──register──▶ YangModelRegistry
//!                                │
//!           ┌────────────────────┼────────────────────┐
//!           ▼                    ▼                    ▼
//!      IdConverter         YangTreeBuilder     YangObjectBuilder
//!   ModelObjectId ⇄ ResourceId   objects ─▶ tree     tree ─▶ objects
//!                                │
//!                                ▼
//!                       SerializerRegistry (json-tree, ...)
//! ```

pub mod config;
pub mod convert;
pub mod data;
pub mod error;
pub mod model;
pub mod registry;
pub mod runtime;
pub mod schema;
pub mod serializer;

pub use config::{RegistryConfig, RuntimeConfig};
pub use convert::{IdConverter, ResourceData, YangObjectBuilder, YangTreeBuilder};
pub use data::{
    DataNode, DataNodeBuilder, DataNodeKind, InnerNode, KeyLeaf, LeafNode, LeafValue, NodeKey,
    ResourceId, ResourceIdBuilder, ResourceIdCursor,
};
pub use error::{FieldError, Result, RuntimeError};
pub use model::{
    InnerModelObject, LeafIdentifier, LeafModelObject, ModelKey, ModelObject, ModelObjectData,
    ModelObjectId, ObjectExtensions, TypeDescriptor,
};
pub use registry::YangModelRegistry;
pub use runtime::YangRuntime;
pub use schema::{Revision, SchemaId, SchemaModel, SchemaNodeKind, SchemaNodeRef};
pub use serializer::{
    CompositeData, CompositeStream, JsonTreeSerializer, SerializerRegistry, YangSerializer,
};

//! Runtime facade: registration, conversion and codec dispatch

mod common;

use std::sync::Arc;
use std::thread;

use common::{ytb_aug, ytb_list};
use yang_runtime::serializer::{Annotation, AnnotatedNodeInfo, SerializerContext};
use yang_runtime::{
    CompositeData, CompositeStream, ModelObject, ModelObjectData, ModelObjectId, ResourceData,
    ResourceId, Result, RuntimeConfig, RuntimeError, YangRuntime, YangSerializer,
};

fn runtime(config: RuntimeConfig) -> YangRuntime {
    let runtime = YangRuntime::new(config);
    runtime
        .register_model(common::augment_model(), common::AUGMENT_BINDINGS)
        .unwrap();
    runtime.register_model(common::list_model(), common::LIST_BINDINGS).unwrap();
    runtime
}

fn modules_data() -> ModelObjectData {
    let modules = ytb_list::Modules {
        module_list: vec![ytb_list::entry("m1", 1, "2016-01-01")],
        tag: vec!["core".to_string()],
        ..Default::default()
    };
    ModelObjectData::new(ModelObjectId::root()).with_object(ModelObject::inner(modules))
}

/// Codec reporting only how many top-level nodes it saw
struct NodeCountSerializer;

impl YangSerializer for NodeCountSerializer {
    fn format(&self) -> &str {
        "node-count"
    }

    fn encode(
        &self,
        data: &CompositeData,
        _context: &SerializerContext<'_>,
    ) -> Result<CompositeStream> {
        Ok(CompositeStream {
            resource_id: None,
            bytes: data.resource_data.data_nodes.len().to_string().into_bytes(),
        })
    }

    fn decode(
        &self,
        _stream: &CompositeStream,
        _context: &SerializerContext<'_>,
    ) -> Result<CompositeData> {
        Err(RuntimeError::UnsupportedFormat("node-count cannot decode".to_string()))
    }
}

#[test]
fn test_json_tree_round_trip_with_annotations() {
    let runtime = runtime(RuntimeConfig::default());
    let tree = runtime.to_resource_data(&modules_data()).unwrap();
    let mut composite = CompositeData::new(tree);
    let entry_id = ResourceId::builder()
        .add_branch_point("modules", Some("urn:ytb-list".to_string()))
        .build();
    composite.annotations.push(AnnotatedNodeInfo {
        resource_id: entry_id,
        annotations: vec![Annotation::new("operation", "merge")],
    });

    let stream = runtime.encode(&composite, None).unwrap();
    assert_eq!(stream.resource_id.as_deref(), Some("/"));
    let decoded = runtime.decode(&stream, Some("json-tree")).unwrap();

    assert_eq!(decoded, composite);
    let objects = runtime.to_model_object_data(&decoded.resource_data).unwrap();
    assert_eq!(objects, modules_data());
}

#[test]
fn test_pretty_output_follows_config() {
    let mut config = RuntimeConfig::default();
    config.serializer.pretty = true;
    let runtime = runtime(config);
    let composite = CompositeData::new(runtime.to_resource_data(&modules_data()).unwrap());

    let stream = runtime.encode(&composite, None).unwrap();

    assert!(String::from_utf8(stream.bytes).unwrap().contains('\n'));
}

#[test]
fn test_unknown_format_rejected() {
    let runtime = runtime(RuntimeConfig::default());
    let composite = CompositeData::new(runtime.to_resource_data(&modules_data()).unwrap());

    let err = runtime.encode(&composite, Some("xml")).unwrap_err();
    assert!(matches!(err, RuntimeError::UnsupportedFormat(ref f) if f == "xml"));
}

#[test]
fn test_decode_rejects_unresolvable_id() {
    let runtime = runtime(RuntimeConfig::default());
    let nowhere = ResourceId::builder().add_branch_point("nowhere", None).build();
    let composite = CompositeData::new(ResourceData::new(nowhere));
    let stream = CompositeStream {
        resource_id: None,
        bytes: serde_json::to_vec(&composite).unwrap(),
    };

    assert!(runtime.decode(&stream, None).is_err());
}

#[test]
fn test_custom_serializer_dispatch() {
    let runtime = runtime(RuntimeConfig::default());
    runtime.register_serializer(Arc::new(NodeCountSerializer));
    let composite = CompositeData::new(runtime.to_resource_data(&modules_data()).unwrap());

    let stream = runtime.encode(&composite, Some("node-count")).unwrap();

    assert_eq!(stream.bytes, b"1".to_vec());
}

#[test]
fn test_unregistered_model_no_longer_converts() {
    let runtime = runtime(RuntimeConfig::default());
    assert!(runtime.unregister_model("ytb-list"));
    assert!(!runtime.unregister_model("ytb-list"));

    let err = runtime.to_resource_data(&modules_data()).unwrap_err();
    assert!(matches!(err, RuntimeError::SchemaResolution(_)));
}

#[test]
fn test_conversions_share_registry_across_threads() {
    let runtime = runtime(RuntimeConfig::default());

    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            let runtime = runtime.clone();
            thread::spawn(move || {
                let cont1 = ytb_aug::Cont1 {
                    leaf1: Some(i),
                    ..Default::default()
                };
                let data =
                    ModelObjectData::new(ModelObjectId::root()).with_object(ModelObject::inner(cont1));
                let tree = runtime.to_resource_data(&data).unwrap();
                runtime.to_model_object_data(&tree).unwrap() == data
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

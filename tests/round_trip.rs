//! Objects survive YTB followed by YOB, and trees survive YOB followed by YTB

mod common;

use common::{ytb_any, ytb_aug, ytb_aug_ext, ytb_food, ytb_food_ext, ytb_list};
use pretty_assertions::assert_eq;
use yang_runtime::{
    IdConverter, InnerModelObject, LeafIdentifier, LeafModelObject, LeafValue, ModelObject,
    ModelObjectData, ModelObjectId, ObjectExtensions, ResourceIdCursor, YangModelRegistry,
    YangObjectBuilder, YangTreeBuilder,
};

fn round_trip(registry: &YangModelRegistry, data: &ModelObjectData) -> ModelObjectData {
    let tree = YangTreeBuilder::new(registry).build(data).unwrap();
    YangObjectBuilder::new(registry).build(&tree).unwrap()
}

fn object_data(object: impl InnerModelObject) -> ModelObjectData {
    ModelObjectData::new(ModelObjectId::root()).with_object(ModelObject::inner(object))
}

#[test]
fn test_augmented_container_round_trips() {
    let registry = common::registry();
    let mut extensions = ObjectExtensions::new();
    extensions.add_augmentation(Box::new(ytb_aug_ext::AugmentedCont1 {
        aug_leaf: Some("aug".to_string()),
        aug_cont: Some(ytb_aug_ext::AugCont {
            aug_tag: vec!["x".to_string(), "y".to_string()],
            ..Default::default()
        }),
        ..Default::default()
    }));
    let data = object_data(ytb_aug::Cont1 {
        leaf1: Some(7),
        cont2: Some(ytb_aug::Cont2 {
            leaf2: Some("deep".to_string()),
            ..Default::default()
        }),
        extensions,
    });

    assert_eq!(round_trip(&registry, &data), data);
}

#[test]
fn test_nested_augment_round_trips() {
    let registry = common::registry();
    let mut extensions = ObjectExtensions::new();
    extensions.add_augmentation(Box::new(ytb_aug_ext::AugmentedCont2 {
        leaf4: Some(500),
        cont1s: Some(ytb_aug_ext::Cont1s {
            cont1s: Some(ytb_aug_ext::cont1s::Cont1s::default()),
            ..Default::default()
        }),
        ..Default::default()
    }));
    let data = object_data(ytb_aug::Cont1 {
        cont2: Some(ytb_aug::Cont2 {
            leaf2: Some("deep".to_string()),
            extensions,
        }),
        ..Default::default()
    });

    assert_eq!(round_trip(&registry, &data), data);
}

#[test]
fn test_top_level_leaves_round_trip() {
    let registry = common::registry();
    let data = ModelObjectData::new(ModelObjectId::root())
        .with_object(ModelObject::Leaf(LeafModelObject::new(
            LeafIdentifier::new("ytb_aug::YtbAug", "top-leaf"),
            vec![LeafValue::String("t".into())],
        )))
        .with_object(ModelObject::Leaf(LeafModelObject::new(
            LeafIdentifier::new("ytb_aug::YtbAug", "top-tags"),
            vec![LeafValue::Uint(1), LeafValue::Uint(2)],
        )));

    assert_eq!(round_trip(&registry, &data), data);
}

#[test]
fn test_keyed_list_round_trips() {
    let registry = common::registry();
    let data = object_data(ytb_list::Modules {
        module_list: vec![
            ytb_list::entry("ietf-interfaces", 1, "2014-05-08"),
            ytb_list::entry("ietf-ip", 2, "2014-06-16"),
        ],
        tag: vec!["core".to_string(), "ip".to_string()],
        ..Default::default()
    });

    assert_eq!(round_trip(&registry, &data), data);
}

#[test]
fn test_choice_cases_round_trip() {
    let registry = common::registry();
    let native = object_data(ytb_food::Food {
        snack: Some(Box::new(ytb_food::LateNight {
            chocolate: Some("dark".to_string()),
            ..Default::default()
        })),
        ..Default::default()
    });
    let augmented = object_data(ytb_food::Food {
        snack: Some(Box::new(ytb_food_ext::Healthy {
            fruit: Some("kiwi".to_string()),
            ..Default::default()
        })),
        ..Default::default()
    });

    assert_eq!(round_trip(&registry, &native), native);
    assert_eq!(round_trip(&registry, &augmented), augmented);
}

#[test]
fn test_anydata_round_trips() {
    let registry = common::registry();
    let mut payload = ytb_any::Payload::default();
    payload.extensions.add_anydata(Box::new(ytb_any::Status {
        code: Some(503),
        ..Default::default()
    }));
    let data = object_data(ytb_any::HolderCont {
        payload: Some(payload),
        ..Default::default()
    });

    assert_eq!(round_trip(&registry, &data), data);
}

#[test]
fn test_tree_round_trips_through_objects() {
    let registry = common::registry();
    let data = object_data(ytb_list::Modules {
        module_list: vec![ytb_list::entry("m1", 3, "2017-01-01")],
        ..Default::default()
    });
    let tree = YangTreeBuilder::new(&registry).build(&data).unwrap();

    let objects = YangObjectBuilder::new(&registry).build(&tree).unwrap();
    let again = YangTreeBuilder::new(&registry).build(&objects).unwrap();

    assert_eq!(again, tree);
}

#[test]
fn test_entry_ids_round_trip() {
    let registry = common::registry();
    let mut builder = ModelObjectId::builder();
    builder
        .add_child_of::<ytb_list::Modules>()
        .unwrap()
        .add_entry_of::<ytb_list::ModuleList, _>(ytb_list::ModuleListKeys {
            module_type: 4,
            name: "m4".to_string(),
        })
        .unwrap();
    let id = builder.build();
    let converter = IdConverter::new(&registry);

    let (rid, node) = converter.to_resource_id(&id).unwrap();
    assert_eq!(node.map(|n| n.name()), Some("module-list"));

    assert_eq!(converter.to_model_object_id(&rid).unwrap(), id);
}

#[test]
fn test_text_keys_convert_to_typed_keys() {
    let registry = common::registry();
    let mut cursor = ResourceIdCursor::new(&registry);
    cursor
        .add_to_resource_id("modules", Some("urn:ytb-list"), None)
        .unwrap()
        .add_to_resource_id("module-list", None, Some("m7, 7"))
        .unwrap();
    let rid = cursor.build();
    assert_eq!(rid.to_string(), "/modules/module-list[name=m7][type=7]");

    let id = IdConverter::new(&registry).to_model_object_id(&rid).unwrap();

    let mut expected = ModelObjectId::builder();
    expected
        .add_child_of::<ytb_list::Modules>()
        .unwrap()
        .add_entry_of::<ytb_list::ModuleList, _>(ytb_list::ModuleListKeys {
            module_type: 7,
            name: "m7".to_string(),
        })
        .unwrap();
    assert_eq!(id, expected.build());
}

//! Shared fixtures: compiled models and the classes generated for them
//!
//! The types below are written the way the code generator emits them: plain
//! structs with an `extensions` slot, one static descriptor per class and the
//! boilerplate supplied by the runtime macros.

#![allow(dead_code)]

use yang_runtime::schema::SchemaNodeKind;
use yang_runtime::{SchemaModel, YangModelRegistry};

// =============================================================================
// ytb-aug / ytb-aug-ext
// =============================================================================

pub mod ytb_aug {
    use yang_runtime::model::{new_object, ObjectExtensions, TypeDescriptor};
    use yang_runtime::{container_field, inner_model_object, leaf_field, leaf_list_field};

    /// Module class; owns the top-level leaves of `ytb-aug`
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct YtbAug {
        pub top_leaf: Option<String>,
        pub top_tags: Vec<u32>,
        pub extensions: ObjectExtensions,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Cont1 {
        pub leaf1: Option<u32>,
        pub cont2: Option<Cont2>,
        pub extensions: ObjectExtensions,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Cont2 {
        pub leaf2: Option<String>,
        pub extensions: ObjectExtensions,
    }

    pub static YTB_AUG: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_aug::YtbAug",
        fields: &[
            leaf_field!("top-leaf", YtbAug, top_leaf),
            leaf_list_field!("top-tags", YtbAug, top_tags),
        ],
        key: None,
        new: new_object::<YtbAug>,
    };

    pub static CONT1: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_aug::Cont1",
        fields: &[
            leaf_field!("leaf1", Cont1, leaf1),
            container_field!("cont2", Cont1, cont2: Cont2),
        ],
        key: None,
        new: new_object::<Cont1>,
    };

    pub static CONT2: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_aug::Cont2",
        fields: &[leaf_field!("leaf2", Cont2, leaf2)],
        key: None,
        new: new_object::<Cont2>,
    };

    inner_model_object!(YtbAug, YTB_AUG);
    inner_model_object!(Cont1, CONT1);
    inner_model_object!(Cont2, CONT2);
}

pub mod ytb_aug_ext {
    use yang_runtime::model::{new_object, ObjectExtensions, TypeDescriptor};
    use yang_runtime::{container_field, inner_model_object, leaf_field, leaf_list_field};

    /// Augmentation of `ytb-aug:cont1`
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AugmentedCont1 {
        pub aug_leaf: Option<String>,
        pub aug_cont: Option<AugCont>,
        pub extensions: ObjectExtensions,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AugCont {
        pub aug_tag: Vec<String>,
        pub extensions: ObjectExtensions,
    }

    pub static AUGMENTED_CONT1: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_aug_ext::AugmentedCont1",
        fields: &[
            leaf_field!("aug-leaf", AugmentedCont1, aug_leaf),
            container_field!("aug-cont", AugmentedCont1, aug_cont: AugCont),
        ],
        key: None,
        new: new_object::<AugmentedCont1>,
    };

    pub static AUG_CONT: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_aug_ext::AugCont",
        fields: &[leaf_list_field!("aug-tag", AugCont, aug_tag)],
        key: None,
        new: new_object::<AugCont>,
    };

    /// Augmentation of `ytb-aug:cont1/cont2`
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AugmentedCont2 {
        pub leaf4: Option<u32>,
        pub cont1s: Option<Cont1s>,
        pub extensions: ObjectExtensions,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Cont1s {
        pub cont1s: Option<cont1s::Cont1s>,
        pub extensions: ObjectExtensions,
    }

    pub static AUGMENTED_CONT2: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_aug_ext::AugmentedCont2",
        fields: &[
            leaf_field!("leaf4", AugmentedCont2, leaf4),
            container_field!("cont1s", AugmentedCont2, cont1s: Cont1s),
        ],
        key: None,
        new: new_object::<AugmentedCont2>,
    };

    pub static CONT1S: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_aug_ext::Cont1s",
        fields: &[container_field!("cont1s", Cont1s, cont1s: cont1s::Cont1s)],
        key: None,
        new: new_object::<Cont1s>,
    };

    inner_model_object!(AugmentedCont1, AUGMENTED_CONT1);
    inner_model_object!(AugCont, AUG_CONT);
    inner_model_object!(AugmentedCont2, AUGMENTED_CONT2);
    inner_model_object!(Cont1s, CONT1S);

    /// Classes nested under `cont1s`
    pub mod cont1s {
        use yang_runtime::inner_model_object;
        use yang_runtime::model::{new_object, ObjectExtensions, TypeDescriptor};

        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct Cont1s {
            pub extensions: ObjectExtensions,
        }

        pub static CONT1S: TypeDescriptor = TypeDescriptor {
            class_name: "ytb_aug_ext::cont1s::Cont1s",
            fields: &[],
            key: None,
            new: new_object::<Cont1s>,
        };

        inner_model_object!(Cont1s, CONT1S);
    }
}

pub static AUGMENT_BINDINGS: &[&yang_runtime::TypeDescriptor] = &[
    &ytb_aug::YTB_AUG,
    &ytb_aug::CONT1,
    &ytb_aug::CONT2,
    &ytb_aug_ext::AUGMENTED_CONT1,
    &ytb_aug_ext::AUG_CONT,
    &ytb_aug_ext::AUGMENTED_CONT2,
    &ytb_aug_ext::CONT1S,
    &ytb_aug_ext::cont1s::CONT1S,
];

pub fn augment_model() -> SchemaModel {
    SchemaModel::from_json(include_str!("../fixtures/ytb_augment.json")).unwrap()
}

// =============================================================================
// ytb-list
// =============================================================================

pub mod ytb_list {
    use yang_runtime::model::{new_key, new_object, KeyDescriptor, ObjectExtensions, TypeDescriptor};
    use yang_runtime::{
        inner_model_object, key_leaf, leaf_field, leaf_list_field, list_field, model_key,
    };

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Modules {
        pub module_list: Vec<ModuleList>,
        pub tag: Vec<String>,
        pub extensions: ObjectExtensions,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ModuleList {
        pub name: Option<String>,
        pub module_type: Option<u8>,
        pub revision: Option<String>,
        pub extensions: ObjectExtensions,
    }

    /// Key of `module-list`; schema key order is `name`, `type`
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ModuleListKeys {
        pub module_type: u8,
        pub name: String,
    }

    pub static MODULE_LIST_KEYS: KeyDescriptor = KeyDescriptor {
        class_name: "ytb_list::ModuleListKeys",
        leaves: &[
            key_leaf!("type", ModuleListKeys, module_type),
            key_leaf!("name", ModuleListKeys, name),
        ],
        new: new_key::<ModuleListKeys>,
    };

    pub static MODULES: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_list::Modules",
        fields: &[
            list_field!("module-list", Modules, module_list: ModuleList),
            leaf_list_field!("tag", Modules, tag),
        ],
        key: None,
        new: new_object::<Modules>,
    };

    pub static MODULE_LIST: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_list::ModuleList",
        fields: &[
            leaf_field!("name", ModuleList, name),
            leaf_field!("type", ModuleList, module_type),
            leaf_field!("revision", ModuleList, revision),
        ],
        key: Some(&MODULE_LIST_KEYS),
        new: new_object::<ModuleList>,
    };

    inner_model_object!(Modules, MODULES);
    inner_model_object!(ModuleList, MODULE_LIST);
    model_key!(ModuleListKeys, MODULE_LIST_KEYS);

    pub fn entry(name: &str, module_type: u8, revision: &str) -> ModuleList {
        ModuleList {
            name: Some(name.to_string()),
            module_type: Some(module_type),
            revision: Some(revision.to_string()),
            ..Default::default()
        }
    }
}

pub static LIST_BINDINGS: &[&yang_runtime::TypeDescriptor] =
    &[&ytb_list::MODULES, &ytb_list::MODULE_LIST];

pub fn list_model() -> SchemaModel {
    SchemaModel::from_json(include_str!("../fixtures/ytb_list.json")).unwrap()
}

// =============================================================================
// ytb-rpc
// =============================================================================

pub mod ytb_rpc {
    use yang_runtime::model::{new_object, ObjectExtensions, TypeDescriptor};
    use yang_runtime::{container_field, inner_model_object, leaf_field};

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TestRpcInput {
        pub test_container: Option<TestContainer>,
        pub extensions: ObjectExtensions,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TestContainer {
        pub name: Option<String>,
        pub extensions: ObjectExtensions,
    }

    pub static TEST_RPC_INPUT: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_rpc::TestRpcInput",
        fields: &[container_field!("test-container", TestRpcInput, test_container: TestContainer)],
        key: None,
        new: new_object::<TestRpcInput>,
    };

    pub static TEST_CONTAINER: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_rpc::TestContainer",
        fields: &[leaf_field!("name", TestContainer, name)],
        key: None,
        new: new_object::<TestContainer>,
    };

    inner_model_object!(TestRpcInput, TEST_RPC_INPUT);
    inner_model_object!(TestContainer, TEST_CONTAINER);
}

pub static RPC_BINDINGS: &[&yang_runtime::TypeDescriptor] =
    &[&ytb_rpc::TEST_RPC_INPUT, &ytb_rpc::TEST_CONTAINER];

pub fn rpc_model() -> SchemaModel {
    let mut b = SchemaModel::builder("ytb-rpc");
    let m = b.module("ytb-rpc", "urn:ytb-rpc", None);
    let rpc = b.child(m, SchemaNodeKind::Rpc, "test-rpc").unwrap();
    let input = b.child(rpc, SchemaNodeKind::Input, "input").unwrap();
    b.set_class(input, "ytb_rpc::TestRpcInput").unwrap();
    let cont = b.child(input, SchemaNodeKind::Container, "test-container").unwrap();
    b.set_class(cont, "ytb_rpc::TestContainer").unwrap();
    b.child(cont, SchemaNodeKind::Leaf, "name").unwrap();
    b.build().unwrap()
}

// =============================================================================
// ytb-food / ytb-food-ext (choice and case)
// =============================================================================

pub mod ytb_food {
    use yang_runtime::model::{new_object, InnerModelObject, ObjectExtensions, TypeDescriptor};
    use yang_runtime::{choice_field, inner_model_object, leaf_field};

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Food {
        /// Selected case of choice `snack`
        pub snack: Option<Box<dyn InnerModelObject>>,
        pub extensions: ObjectExtensions,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SportsArena {
        pub pretzel: Option<()>,
        pub beer: Option<()>,
        pub extensions: ObjectExtensions,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct LateNight {
        pub chocolate: Option<String>,
        pub extensions: ObjectExtensions,
    }

    pub static FOOD: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_food::Food",
        fields: &[choice_field!("snack", Food, snack)],
        key: None,
        new: new_object::<Food>,
    };

    pub static SPORTS_ARENA: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_food::SportsArena",
        fields: &[
            leaf_field!("pretzel", SportsArena, pretzel),
            leaf_field!("beer", SportsArena, beer),
        ],
        key: None,
        new: new_object::<SportsArena>,
    };

    pub static LATE_NIGHT: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_food::LateNight",
        fields: &[leaf_field!("chocolate", LateNight, chocolate)],
        key: None,
        new: new_object::<LateNight>,
    };

    inner_model_object!(Food, FOOD);
    inner_model_object!(SportsArena, SPORTS_ARENA);
    inner_model_object!(LateNight, LATE_NIGHT);
}

pub mod ytb_food_ext {
    use yang_runtime::model::{new_object, ObjectExtensions, TypeDescriptor};
    use yang_runtime::{inner_model_object, leaf_field};

    /// Case added to choice `snack` by augment
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Healthy {
        pub fruit: Option<String>,
        pub extensions: ObjectExtensions,
    }

    pub static HEALTHY: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_food_ext::Healthy",
        fields: &[leaf_field!("fruit", Healthy, fruit)],
        key: None,
        new: new_object::<Healthy>,
    };

    inner_model_object!(Healthy, HEALTHY);
}

pub static FOOD_BINDINGS: &[&yang_runtime::TypeDescriptor] = &[
    &ytb_food::FOOD,
    &ytb_food::SPORTS_ARENA,
    &ytb_food::LATE_NIGHT,
    &ytb_food_ext::HEALTHY,
];

pub fn food_model() -> SchemaModel {
    let mut b = SchemaModel::builder("ytb-food");
    let m = b.module("ytb-food", "urn:ytb-food", None);
    let food = b.child(m, SchemaNodeKind::Container, "food").unwrap();
    b.set_class(food, "ytb_food::Food").unwrap();
    let snack = b.child(food, SchemaNodeKind::Choice, "snack").unwrap();
    let arena = b.child(snack, SchemaNodeKind::Case, "sports-arena").unwrap();
    b.set_class(arena, "ytb_food::SportsArena").unwrap();
    b.child(arena, SchemaNodeKind::Leaf, "pretzel").unwrap();
    b.child(arena, SchemaNodeKind::Leaf, "beer").unwrap();
    let night = b.child(snack, SchemaNodeKind::Case, "late-night").unwrap();
    b.set_class(night, "ytb_food::LateNight").unwrap();
    b.child(night, SchemaNodeKind::Leaf, "chocolate").unwrap();

    let ext = b.module("ytb-food-ext", "urn:ytb-food-ext", None);
    let target = b.resolve_path("/ytb-food:food/snack").unwrap();
    let aug = b.augment(ext, target).unwrap();
    let healthy = b.child(aug, SchemaNodeKind::Case, "healthy").unwrap();
    b.set_class(healthy, "ytb_food_ext::Healthy").unwrap();
    b.child(healthy, SchemaNodeKind::Leaf, "fruit").unwrap();
    b.build().unwrap()
}

// =============================================================================
// ytb-any / ytb-any-payload (anydata)
// =============================================================================

pub mod ytb_any {
    use yang_runtime::model::{new_object, ObjectExtensions, TypeDescriptor};
    use yang_runtime::{container_field, inner_model_object, leaf_field};

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct HolderCont {
        pub payload: Option<Payload>,
        pub extensions: ObjectExtensions,
    }

    /// Anydata holder; payloads live in the extensions
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Payload {
        pub extensions: ObjectExtensions,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Status {
        pub code: Option<u16>,
        pub extensions: ObjectExtensions,
    }

    pub static HOLDER_CONT: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_any::HolderCont",
        fields: &[container_field!("payload", HolderCont, payload: Payload)],
        key: None,
        new: new_object::<HolderCont>,
    };

    pub static PAYLOAD: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_any::Payload",
        fields: &[],
        key: None,
        new: new_object::<Payload>,
    };

    pub static STATUS: TypeDescriptor = TypeDescriptor {
        class_name: "ytb_any_payload::Status",
        fields: &[leaf_field!("code", Status, code)],
        key: None,
        new: new_object::<Status>,
    };

    inner_model_object!(HolderCont, HOLDER_CONT);
    inner_model_object!(Payload, PAYLOAD);
    inner_model_object!(Status, STATUS);
}

pub static ANY_BINDINGS: &[&yang_runtime::TypeDescriptor] =
    &[&ytb_any::HOLDER_CONT, &ytb_any::PAYLOAD, &ytb_any::STATUS];

pub fn any_model() -> SchemaModel {
    let mut b = SchemaModel::builder("ytb-any");
    let m = b.module("ytb-any", "urn:ytb-any", None);
    let holder = b.child(m, SchemaNodeKind::Container, "holder-cont").unwrap();
    b.set_class(holder, "ytb_any::HolderCont").unwrap();
    let payload = b.child(holder, SchemaNodeKind::Anydata, "payload").unwrap();
    b.set_class(payload, "ytb_any::Payload").unwrap();

    let p = b.module("ytb-any-payload", "urn:ytb-any-payload", None);
    let status = b.child(p, SchemaNodeKind::Container, "status").unwrap();
    b.set_class(status, "ytb_any_payload::Status").unwrap();
    b.child(status, SchemaNodeKind::Leaf, "code").unwrap();
    b.build().unwrap()
}

// =============================================================================
// Registry with every fixture model
// =============================================================================

pub fn registry() -> YangModelRegistry {
    let mut registry = YangModelRegistry::new();
    registry.register_model(augment_model(), AUGMENT_BINDINGS).unwrap();
    registry.register_model(list_model(), LIST_BINDINGS).unwrap();
    registry.register_model(rpc_model(), RPC_BINDINGS).unwrap();
    registry.register_model(food_model(), FOOD_BINDINGS).unwrap();
    registry.register_model(any_model(), ANY_BINDINGS).unwrap();
    registry
        .register_anydata_schema("ytb_any::Payload", "ytb_any_payload::Status")
        .unwrap();
    registry
}

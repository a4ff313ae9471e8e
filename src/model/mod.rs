//! Generated Object Support
//!
//! Contract between the runtime and classes produced by the YANG code
//! generator. Every generated class implements [`InnerModelObject`] and
//! publishes a static [`TypeDescriptor`] listing its fields by YANG name with
//! typed accessors. The converters only ever touch objects through those
//! descriptors, so no reflection or naming conventions are involved.
//!
//! Generated code usually spells the descriptors with the field macros
//! exported by this module:
//!
//! ```ignore
//! #[derive(Debug, Clone, Default, PartialEq)]
//! pub struct Cont1 {
//!     pub leaf1: Option<u32>,
//!     pub extensions: ObjectExtensions,
//! }
//!
//! pub static CONT1: TypeDescriptor = TypeDescriptor {
//!     class_name: "ytb_aug::Cont1",
//!     fields: &[leaf_field!("leaf1", Cont1, leaf1)],
//!     key: None,
//!     new: new_object::<Cont1>,
//! };
//!
//! inner_model_object!(Cont1, CONT1);
//! ```

pub mod id;

pub use id::{AtomicPath, ModelObjectId, ModelObjectIdBuilder};

use std::any::{type_name, Any};
use std::fmt;

use crate::data::LeafValue;
use crate::error::FieldError;

// =============================================================================
// Object traits
// =============================================================================

/// A generated container, list entry, case, augmentation or anydata object
pub trait InnerModelObject: Any + fmt::Debug + Send + Sync {
    /// Descriptor of the concrete class
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Descriptor without an instance
    fn type_descriptor() -> &'static TypeDescriptor
    where
        Self: Sized;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Augmentations and anydata payloads attached to this object
    fn extensions(&self) -> &ObjectExtensions;

    fn extensions_mut(&mut self) -> &mut ObjectExtensions;

    fn clone_object(&self) -> Box<dyn InnerModelObject>;

    fn eq_object(&self, other: &dyn InnerModelObject) -> bool;

    fn class_name(&self) -> &'static str {
        self.descriptor().class_name
    }
}

impl Clone for Box<dyn InnerModelObject> {
    fn clone(&self) -> Self {
        self.clone_object()
    }
}

impl PartialEq for dyn InnerModelObject {
    fn eq(&self, other: &Self) -> bool {
        self.eq_object(other)
    }
}

/// Key class of a generated list
pub trait ModelKey: Any + fmt::Debug + Send + Sync {
    fn descriptor(&self) -> &'static KeyDescriptor;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn clone_key(&self) -> Box<dyn ModelKey>;

    fn eq_key(&self, other: &dyn ModelKey) -> bool;
}

impl Clone for Box<dyn ModelKey> {
    fn clone(&self) -> Self {
        self.clone_key()
    }
}

impl PartialEq for dyn ModelKey {
    fn eq(&self, other: &Self) -> bool {
        self.eq_key(other)
    }
}

// =============================================================================
// Descriptors
// =============================================================================

/// Static description of a generated class
#[derive(Debug)]
pub struct TypeDescriptor {
    /// Qualified class name, as recorded on the schema node
    pub class_name: &'static str,
    pub fields: &'static [FieldDescriptor],
    /// Key class, lists only
    pub key: Option<&'static KeyDescriptor>,
    /// Default-constructed instance
    pub new: fn() -> Box<dyn InnerModelObject>,
}

impl TypeDescriptor {
    /// Field accessor for a YANG child name
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A field of a generated class, named by its YANG identifier
#[derive(Debug)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub access: FieldAccess,
}

/// Typed accessors of one field
///
/// Choice fields hold the selected case object; the case class decides which
/// case of the choice is populated.
#[derive(Debug, Clone, Copy)]
pub enum FieldAccess {
    Leaf {
        get: fn(&dyn InnerModelObject) -> Result<Option<LeafValue>, FieldError>,
        set: fn(&mut dyn InnerModelObject, &LeafValue) -> Result<(), FieldError>,
    },
    LeafList {
        get: fn(&dyn InnerModelObject) -> Result<Vec<LeafValue>, FieldError>,
        push: fn(&mut dyn InnerModelObject, &LeafValue) -> Result<(), FieldError>,
    },
    /// Containers and anydata holders
    Container {
        get: fn(&dyn InnerModelObject) -> Result<Option<&dyn InnerModelObject>, FieldError>,
        set: fn(&mut dyn InnerModelObject, Box<dyn InnerModelObject>) -> Result<(), FieldError>,
    },
    List {
        get: fn(&dyn InnerModelObject) -> Result<Vec<&dyn InnerModelObject>, FieldError>,
        push: fn(&mut dyn InnerModelObject, Box<dyn InnerModelObject>) -> Result<(), FieldError>,
    },
    Choice {
        get: fn(&dyn InnerModelObject) -> Result<Option<&dyn InnerModelObject>, FieldError>,
        set: fn(&mut dyn InnerModelObject, Box<dyn InnerModelObject>) -> Result<(), FieldError>,
    },
}

impl FieldAccess {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldAccess::Leaf { .. } => "leaf",
            FieldAccess::LeafList { .. } => "leaf-list",
            FieldAccess::Container { .. } => "container",
            FieldAccess::List { .. } => "list",
            FieldAccess::Choice { .. } => "choice",
        }
    }
}

/// Static description of a generated key class
#[derive(Debug)]
pub struct KeyDescriptor {
    pub class_name: &'static str,
    /// Key leaves; lookups go by name so declaration order is irrelevant
    pub leaves: &'static [KeyLeafDescriptor],
    pub new: fn() -> Box<dyn ModelKey>,
}

impl KeyDescriptor {
    pub fn leaf(&self, name: &str) -> Option<&'static KeyLeafDescriptor> {
        self.leaves.iter().find(|l| l.name == name)
    }
}

/// One leaf of a key class
#[derive(Debug)]
pub struct KeyLeafDescriptor {
    pub name: &'static str,
    pub get: fn(&dyn ModelKey) -> Result<LeafValue, FieldError>,
    pub set: fn(&mut dyn ModelKey, &LeafValue) -> Result<(), FieldError>,
}

/// Default-constructed instance of a generated class
pub fn new_object<T: InnerModelObject + Default>() -> Box<dyn InnerModelObject> {
    Box::new(T::default())
}

/// Default-constructed instance of a generated key class
pub fn new_key<T: ModelKey + Default>() -> Box<dyn ModelKey> {
    Box::new(T::default())
}

// =============================================================================
// Downcasts used by generated accessors
// =============================================================================

pub fn downcast_ref<T: InnerModelObject>(obj: &dyn InnerModelObject) -> Result<&T, FieldError> {
    obj.as_any().downcast_ref::<T>().ok_or_else(|| FieldError::WrongTarget {
        expected: type_name::<T>(),
        actual: obj.class_name().to_string(),
    })
}

pub fn downcast_mut<T: InnerModelObject>(
    obj: &mut dyn InnerModelObject,
) -> Result<&mut T, FieldError> {
    let actual = obj.class_name();
    obj.as_any_mut().downcast_mut::<T>().ok_or_else(|| FieldError::WrongTarget {
        expected: type_name::<T>(),
        actual: actual.to_string(),
    })
}

/// Unbox an object handed to a field setter
pub fn downcast_box<T: InnerModelObject>(
    obj: Box<dyn InnerModelObject>,
    field: &'static str,
) -> Result<Box<T>, FieldError> {
    let actual = obj.class_name();
    obj.into_any().downcast::<T>().map_err(|_| FieldError::WrongObject {
        field,
        actual: actual.to_string(),
    })
}

pub fn key_ref<T: ModelKey>(key: &dyn ModelKey) -> Result<&T, FieldError> {
    key.as_any().downcast_ref::<T>().ok_or_else(|| FieldError::WrongTarget {
        expected: type_name::<T>(),
        actual: key.descriptor().class_name.to_string(),
    })
}

pub fn key_mut<T: ModelKey>(key: &mut dyn ModelKey) -> Result<&mut T, FieldError> {
    let actual = key.descriptor().class_name;
    key.as_any_mut().downcast_mut::<T>().ok_or_else(|| FieldError::WrongTarget {
        expected: type_name::<T>(),
        actual: actual.to_string(),
    })
}

// =============================================================================
// Extensions
// =============================================================================

/// Augmentations and anydata payloads carried by an object
///
/// At most one augmentation per class is kept. Equality ignores the order
/// augmentations were attached in; anydata payloads compare in order.
#[derive(Debug, Clone, Default)]
pub struct ObjectExtensions {
    augmentations: Vec<Box<dyn InnerModelObject>>,
    anydata: Vec<Box<dyn InnerModelObject>>,
}

impl ObjectExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an augmentation, replacing one of the same class
    pub fn add_augmentation(&mut self, augmentation: Box<dyn InnerModelObject>) {
        let class = augmentation.class_name();
        match self.augmentations.iter_mut().find(|a| a.class_name() == class) {
            Some(slot) => *slot = augmentation,
            None => self.augmentations.push(augmentation),
        }
    }

    /// Augmentation by class name
    pub fn augmentation(&self, class_name: &str) -> Option<&dyn InnerModelObject> {
        self.augmentations
            .iter()
            .find(|a| a.class_name() == class_name)
            .map(|a| a.as_ref())
    }

    /// Augmentation by concrete type
    pub fn augmentation_of<T: InnerModelObject>(&self) -> Option<&T> {
        self.augmentations.iter().find_map(|a| a.as_any().downcast_ref::<T>())
    }

    pub fn augmentations(&self) -> impl Iterator<Item = &dyn InnerModelObject> + '_ {
        self.augmentations.iter().map(|a| a.as_ref())
    }

    pub fn add_anydata(&mut self, payload: Box<dyn InnerModelObject>) {
        self.anydata.push(payload);
    }

    pub fn anydata(&self) -> impl Iterator<Item = &dyn InnerModelObject> + '_ {
        self.anydata.iter().map(|a| a.as_ref())
    }

    pub fn anydata_of<T: InnerModelObject>(&self) -> Option<&T> {
        self.anydata.iter().find_map(|a| a.as_any().downcast_ref::<T>())
    }

    pub fn is_empty(&self) -> bool {
        self.augmentations.is_empty() && self.anydata.is_empty()
    }
}

impl PartialEq for ObjectExtensions {
    fn eq(&self, other: &Self) -> bool {
        self.augmentations.len() == other.augmentations.len()
            && self.augmentations.iter().all(|a| {
                other
                    .augmentation(a.class_name())
                    .map_or(false, |b| a.eq_object(b))
            })
            && self.anydata == other.anydata
    }
}

// =============================================================================
// Object data
// =============================================================================

/// A leaf addressed by its owning class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafIdentifier {
    /// Class of the schema node holding the leaf
    pub owner: String,
    /// YANG name of the leaf
    pub name: String,
}

impl LeafIdentifier {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for LeafIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// Value(s) of a leaf or leaf-list held outside any object
#[derive(Debug, Clone, PartialEq)]
pub struct LeafModelObject {
    pub leaf: LeafIdentifier,
    /// One value for a leaf, one per entry for a leaf-list
    pub values: Vec<LeafValue>,
}

impl LeafModelObject {
    pub fn new(leaf: LeafIdentifier, values: Vec<LeafValue>) -> Self {
        Self { leaf, values }
    }
}

/// An object or a stand-alone leaf
#[derive(Debug, Clone, PartialEq)]
pub enum ModelObject {
    Inner(Box<dyn InnerModelObject>),
    Leaf(LeafModelObject),
}

impl ModelObject {
    pub fn inner<T: InnerModelObject>(object: T) -> Self {
        ModelObject::Inner(Box::new(object))
    }

    pub fn as_inner(&self) -> Option<&dyn InnerModelObject> {
        match self {
            ModelObject::Inner(object) => Some(object.as_ref()),
            ModelObject::Leaf(_) => None,
        }
    }

    pub fn downcast_ref<T: InnerModelObject>(&self) -> Option<&T> {
        self.as_inner().and_then(|o| o.as_any().downcast_ref::<T>())
    }

    pub fn as_leaf(&self) -> Option<&LeafModelObject> {
        match self {
            ModelObject::Leaf(leaf) => Some(leaf),
            ModelObject::Inner(_) => None,
        }
    }
}

/// Objects positioned under a [`ModelObjectId`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelObjectData {
    pub id: ModelObjectId,
    pub objects: Vec<ModelObject>,
}

impl ModelObjectData {
    pub fn new(id: ModelObjectId) -> Self {
        Self {
            id,
            objects: Vec::new(),
        }
    }

    pub fn with_object(mut self, object: ModelObject) -> Self {
        self.objects.push(object);
        self
    }

    pub fn add_object(&mut self, object: ModelObject) -> &mut Self {
        self.objects.push(object);
        self
    }
}

// =============================================================================
// Macros for generated code
// =============================================================================

/// Implement [`InnerModelObject`] for a generated struct
///
/// The struct must be `Clone + PartialEq + Debug` and carry an
/// `extensions: ObjectExtensions` field.
#[macro_export]
macro_rules! inner_model_object {
    ($ty:ty, $desc:path) => {
        impl $crate::model::InnerModelObject for $ty {
            fn descriptor(&self) -> &'static $crate::model::TypeDescriptor {
                &$desc
            }

            fn type_descriptor() -> &'static $crate::model::TypeDescriptor {
                &$desc
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn ::std::any::Any> {
                self
            }

            fn extensions(&self) -> &$crate::model::ObjectExtensions {
                &self.extensions
            }

            fn extensions_mut(&mut self) -> &mut $crate::model::ObjectExtensions {
                &mut self.extensions
            }

            fn clone_object(&self) -> Box<dyn $crate::model::InnerModelObject> {
                Box::new(self.clone())
            }

            fn eq_object(&self, other: &dyn $crate::model::InnerModelObject) -> bool {
                other.as_any().downcast_ref::<$ty>().map_or(false, |o| self == o)
            }
        }
    };
}

/// Implement [`ModelKey`] for a generated key struct
#[macro_export]
macro_rules! model_key {
    ($ty:ty, $desc:path) => {
        impl $crate::model::ModelKey for $ty {
            fn descriptor(&self) -> &'static $crate::model::KeyDescriptor {
                &$desc
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn clone_key(&self) -> Box<dyn $crate::model::ModelKey> {
                Box::new(self.clone())
            }

            fn eq_key(&self, other: &dyn $crate::model::ModelKey) -> bool {
                other.as_any().downcast_ref::<$ty>().map_or(false, |o| self == o)
            }
        }
    };
}

/// Descriptor of an `Option<T>` leaf field
#[macro_export]
macro_rules! leaf_field {
    ($name:literal, $owner:ty, $field:ident) => {
        $crate::model::FieldDescriptor {
            name: $name,
            access: {
                fn get(
                    obj: &dyn $crate::model::InnerModelObject,
                ) -> ::std::result::Result<Option<$crate::data::LeafValue>, $crate::error::FieldError> {
                    let this = $crate::model::downcast_ref::<$owner>(obj)?;
                    Ok(this.$field.clone().map($crate::data::LeafValue::from))
                }
                fn set(
                    obj: &mut dyn $crate::model::InnerModelObject,
                    value: &$crate::data::LeafValue,
                ) -> ::std::result::Result<(), $crate::error::FieldError> {
                    let this = $crate::model::downcast_mut::<$owner>(obj)?;
                    this.$field = Some($crate::data::FromLeafValue::from_leaf_value(value)?);
                    Ok(())
                }
                $crate::model::FieldAccess::Leaf { get, set }
            },
        }
    };
}

/// Descriptor of a `Vec<T>` leaf-list field
#[macro_export]
macro_rules! leaf_list_field {
    ($name:literal, $owner:ty, $field:ident) => {
        $crate::model::FieldDescriptor {
            name: $name,
            access: {
                fn get(
                    obj: &dyn $crate::model::InnerModelObject,
                ) -> ::std::result::Result<Vec<$crate::data::LeafValue>, $crate::error::FieldError> {
                    let this = $crate::model::downcast_ref::<$owner>(obj)?;
                    Ok(this.$field.iter().cloned().map($crate::data::LeafValue::from).collect())
                }
                fn push(
                    obj: &mut dyn $crate::model::InnerModelObject,
                    value: &$crate::data::LeafValue,
                ) -> ::std::result::Result<(), $crate::error::FieldError> {
                    let this = $crate::model::downcast_mut::<$owner>(obj)?;
                    this.$field.push($crate::data::FromLeafValue::from_leaf_value(value)?);
                    Ok(())
                }
                $crate::model::FieldAccess::LeafList { get, push }
            },
        }
    };
}

/// Descriptor of an `Option<Child>` container or anydata field
#[macro_export]
macro_rules! container_field {
    ($name:literal, $owner:ty, $field:ident : $child:ty) => {
        $crate::model::FieldDescriptor {
            name: $name,
            access: {
                fn get(
                    obj: &dyn $crate::model::InnerModelObject,
                ) -> ::std::result::Result<Option<&dyn $crate::model::InnerModelObject>, $crate::error::FieldError> {
                    let this = $crate::model::downcast_ref::<$owner>(obj)?;
                    Ok(this.$field.as_ref().map(|c| c as &dyn $crate::model::InnerModelObject))
                }
                fn set(
                    obj: &mut dyn $crate::model::InnerModelObject,
                    child: Box<dyn $crate::model::InnerModelObject>,
                ) -> ::std::result::Result<(), $crate::error::FieldError> {
                    let child = $crate::model::downcast_box::<$child>(child, $name)?;
                    let this = $crate::model::downcast_mut::<$owner>(obj)?;
                    this.$field = Some(*child);
                    Ok(())
                }
                $crate::model::FieldAccess::Container { get, set }
            },
        }
    };
}

/// Descriptor of a `Vec<Entry>` list field
#[macro_export]
macro_rules! list_field {
    ($name:literal, $owner:ty, $field:ident : $entry:ty) => {
        $crate::model::FieldDescriptor {
            name: $name,
            access: {
                fn get(
                    obj: &dyn $crate::model::InnerModelObject,
                ) -> ::std::result::Result<Vec<&dyn $crate::model::InnerModelObject>, $crate::error::FieldError> {
                    let this = $crate::model::downcast_ref::<$owner>(obj)?;
                    Ok(this.$field.iter().map(|e| e as &dyn $crate::model::InnerModelObject).collect())
                }
                fn push(
                    obj: &mut dyn $crate::model::InnerModelObject,
                    entry: Box<dyn $crate::model::InnerModelObject>,
                ) -> ::std::result::Result<(), $crate::error::FieldError> {
                    let entry = $crate::model::downcast_box::<$entry>(entry, $name)?;
                    let this = $crate::model::downcast_mut::<$owner>(obj)?;
                    this.$field.push(*entry);
                    Ok(())
                }
                $crate::model::FieldAccess::List { get, push }
            },
        }
    };
}

/// Descriptor of an `Option<Box<dyn InnerModelObject>>` choice field
#[macro_export]
macro_rules! choice_field {
    ($name:literal, $owner:ty, $field:ident) => {
        $crate::model::FieldDescriptor {
            name: $name,
            access: {
                fn get(
                    obj: &dyn $crate::model::InnerModelObject,
                ) -> ::std::result::Result<Option<&dyn $crate::model::InnerModelObject>, $crate::error::FieldError> {
                    let this = $crate::model::downcast_ref::<$owner>(obj)?;
                    Ok(this.$field.as_deref())
                }
                fn set(
                    obj: &mut dyn $crate::model::InnerModelObject,
                    case: Box<dyn $crate::model::InnerModelObject>,
                ) -> ::std::result::Result<(), $crate::error::FieldError> {
                    let this = $crate::model::downcast_mut::<$owner>(obj)?;
                    this.$field = Some(case);
                    Ok(())
                }
                $crate::model::FieldAccess::Choice { get, set }
            },
        }
    };
}

/// Descriptor of one leaf of a key class
#[macro_export]
macro_rules! key_leaf {
    ($name:literal, $key:ty, $field:ident) => {
        $crate::model::KeyLeafDescriptor {
            name: $name,
            get: {
                fn get(key: &dyn $crate::model::ModelKey) -> ::std::result::Result<$crate::data::LeafValue, $crate::error::FieldError> {
                    let this = $crate::model::key_ref::<$key>(key)?;
                    Ok($crate::data::LeafValue::from(this.$field.clone()))
                }
                get
            },
            set: {
                fn set(
                    key: &mut dyn $crate::model::ModelKey,
                    value: &$crate::data::LeafValue,
                ) -> ::std::result::Result<(), $crate::error::FieldError> {
                    let this = $crate::model::key_mut::<$key>(key)?;
                    this.$field = $crate::data::FromLeafValue::from_leaf_value(value)?;
                    Ok(())
                }
                set
            },
        }
    };
}

//! Model Object Identifiers
//!
//! A [`ModelObjectId`] addresses a location in the object graph by generated
//! class names rather than schema names. An empty id is the root.

use std::fmt;

use super::{InnerModelObject, LeafIdentifier, ModelKey};
use crate::data::LeafValue;
use crate::error::{Result, RuntimeError};

/// One step of a [`ModelObjectId`]
#[derive(Debug, Clone, PartialEq)]
pub enum AtomicPath {
    /// A container or other single-instance object
    SingleInstanceNode { class_name: String },
    /// A list entry identified by its key object
    MultiInstanceNode {
        class_name: String,
        key: Box<dyn ModelKey>,
    },
    SingleInstanceLeaf(LeafIdentifier),
    /// A leaf-list entry identified by its value
    MultiInstanceLeaf { leaf: LeafIdentifier, value: LeafValue },
}

impl AtomicPath {
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            AtomicPath::SingleInstanceLeaf(_) | AtomicPath::MultiInstanceLeaf { .. }
        )
    }
}

impl fmt::Display for AtomicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomicPath::SingleInstanceNode { class_name } => f.write_str(class_name),
            AtomicPath::MultiInstanceNode { class_name, key } => write!(f, "{}[{:?}]", class_name, key),
            AtomicPath::SingleInstanceLeaf(leaf) => write!(f, "{}", leaf),
            AtomicPath::MultiInstanceLeaf { leaf, value } => write!(f, "{}[.={}]", leaf, value),
        }
    }
}

/// Path to a location in the object graph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelObjectId {
    paths: Vec<AtomicPath>,
}

impl ModelObjectId {
    /// The root id
    pub fn root() -> Self {
        Self::default()
    }

    pub fn builder() -> ModelObjectIdBuilder {
        ModelObjectIdBuilder::default()
    }

    pub fn paths(&self) -> &[AtomicPath] {
        &self.paths
    }

    pub fn is_root(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl fmt::Display for ModelObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.paths.is_empty() {
            return f.write_str("/");
        }
        for path in &self.paths {
            write!(f, "/{}", path)?;
        }
        Ok(())
    }
}

/// Builder for a [`ModelObjectId`]
///
/// Nothing may follow a leaf step.
#[derive(Debug, Clone, Default)]
pub struct ModelObjectIdBuilder {
    paths: Vec<AtomicPath>,
}

impl ModelObjectIdBuilder {
    fn push(&mut self, path: AtomicPath) -> Result<&mut Self> {
        if let Some(last) = self.paths.last() {
            if last.is_leaf() {
                return Err(RuntimeError::structural(format!(
                    "cannot append {} after leaf {}",
                    path, last
                )));
            }
        }
        self.paths.push(path);
        Ok(self)
    }

    /// Append a single-instance object by class name
    pub fn add_child(&mut self, class_name: impl Into<String>) -> Result<&mut Self> {
        self.push(AtomicPath::SingleInstanceNode {
            class_name: class_name.into(),
        })
    }

    /// Append a single-instance object by type
    pub fn add_child_of<T: InnerModelObject>(&mut self) -> Result<&mut Self> {
        self.add_child(T::type_descriptor().class_name)
    }

    /// Append a list entry
    pub fn add_child_with_key(
        &mut self,
        class_name: impl Into<String>,
        key: Box<dyn ModelKey>,
    ) -> Result<&mut Self> {
        self.push(AtomicPath::MultiInstanceNode {
            class_name: class_name.into(),
            key,
        })
    }

    /// Append a list entry by type
    pub fn add_entry_of<T: InnerModelObject, K: ModelKey>(&mut self, key: K) -> Result<&mut Self> {
        self.add_child_with_key(T::type_descriptor().class_name, Box::new(key))
    }

    pub fn add_leaf(&mut self, leaf: LeafIdentifier) -> Result<&mut Self> {
        self.push(AtomicPath::SingleInstanceLeaf(leaf))
    }

    pub fn add_leaf_list(&mut self, leaf: LeafIdentifier, value: LeafValue) -> Result<&mut Self> {
        self.push(AtomicPath::MultiInstanceLeaf { leaf, value })
    }

    pub fn build(&self) -> ModelObjectId {
        ModelObjectId {
            paths: self.paths.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_after_leaf() {
        let mut b = ModelObjectId::builder();
        b.add_child("m::Cont1").unwrap()
            .add_leaf(LeafIdentifier::new("m::Cont1", "leaf1")).unwrap();
        assert!(matches!(b.add_child("m::Cont2"), Err(RuntimeError::Structural(_))));
        assert_eq!(b.build().len(), 2);
        assert_eq!(b.build().to_string(), "/m::Cont1/m::Cont1.leaf1");
    }

    #[test]
    fn test_empty_id_is_root() {
        let id = ModelObjectId::builder().build();
        assert!(id.is_root());
        assert_eq!(id, ModelObjectId::root());
    }
}

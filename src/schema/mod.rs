//! Compiled Schema Tree
//!
//! An immutable arena of compiled YANG schema nodes. Nodes are addressed by
//! [`NodeId`] inside a [`SchemaModel`] and handed out as [`SchemaNodeRef`]
//! handles, which borrow the model and are cheap to copy.
//!
//! Lookups through [`SchemaNodeRef::find_data_child`] are transparent to the
//! choice/case layers and to augmentations: they report the elided layers
//! alongside the matched node so callers can rebuild the object graph around
//! them without ever surfacing a choice or case as data.

pub mod builder;
pub mod spec;

pub use builder::SchemaModelBuilder;
pub use spec::{AugmentSpec, ModelSpec, ModuleSpec, NodeSpec};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RuntimeError;

/// Name of the root sentinel every resource id starts with
pub const ROOT_NAME: &str = "/";

// =============================================================================
// Schema identity
// =============================================================================

/// Name + namespace pair identifying a schema node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaId {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
}

impl SchemaId {
    /// Create a schema id
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// The root sentinel (`"/"`, no namespace)
    pub fn root() -> Self {
        Self::new(ROOT_NAME, None)
    }

    pub fn is_root(&self) -> bool {
        self.name == ROOT_NAME && self.namespace.is_none()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether this id matches a lookup by name and optional namespace
    pub fn matches(&self, name: &str, namespace: Option<&str>) -> bool {
        self.name == name && namespace.map_or(true, |ns| self.namespace.as_deref() == Some(ns))
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}:{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

// =============================================================================
// Node kinds and revisions
// =============================================================================

/// Kind of a compiled schema construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaNodeKind {
    Module,
    Container,
    List,
    Leaf,
    LeafList,
    Choice,
    Case,
    Augment,
    Rpc,
    Input,
    Output,
    Notification,
    Anydata,
}

impl SchemaNodeKind {
    /// Choice and case never appear in data trees or ids
    pub fn is_transparent(&self) -> bool {
        matches!(self, SchemaNodeKind::Choice | SchemaNodeKind::Case)
    }

    /// Leaf and leaf-list nodes terminate a path
    pub fn is_leaf_like(&self) -> bool {
        matches!(self, SchemaNodeKind::Leaf | SchemaNodeKind::LeafList)
    }

    /// Nodes that may hold children
    pub fn can_hold_children(&self) -> bool {
        !matches!(
            self,
            SchemaNodeKind::Leaf | SchemaNodeKind::LeafList | SchemaNodeKind::Anydata
        )
    }

    pub fn is_rpc_or_notification(&self) -> bool {
        matches!(self, SchemaNodeKind::Rpc | SchemaNodeKind::Notification)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaNodeKind::Module => "module",
            SchemaNodeKind::Container => "container",
            SchemaNodeKind::List => "list",
            SchemaNodeKind::Leaf => "leaf",
            SchemaNodeKind::LeafList => "leaf-list",
            SchemaNodeKind::Choice => "choice",
            SchemaNodeKind::Case => "case",
            SchemaNodeKind::Augment => "augment",
            SchemaNodeKind::Rpc => "rpc",
            SchemaNodeKind::Input => "input",
            SchemaNodeKind::Output => "output",
            SchemaNodeKind::Notification => "notification",
            SchemaNodeKind::Anydata => "anydata",
        }
    }
}

impl fmt::Display for SchemaNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Module revision date (`YYYY-MM-DD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision(NaiveDate);

impl Revision {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a revision date
    pub fn parse(value: &str) -> Result<Self, RuntimeError> {
        value.parse()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for Revision {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| RuntimeError::invalid_model(format!("invalid revision '{}': {}", s, e)))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for Revision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Revision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Index of a node inside its [`SchemaModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// One compiled schema construct
#[derive(Debug, Clone)]
pub struct SchemaNode {
    /// Name plus effective namespace
    pub(crate) id: SchemaId,
    pub(crate) kind: SchemaNodeKind,
    pub(crate) revision: Option<Revision>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Declared key leaf names, lists only
    pub(crate) keys: Vec<String>,
    /// Augments targeting this node, in compile order
    pub(crate) augments: Vec<NodeId>,
    /// Target of an augment node
    pub(crate) target: Option<NodeId>,
    /// Qualified name of the generated class
    pub(crate) class_name: Option<String>,
    pub(crate) config: bool,
}

/// A compiled set of modules sharing one arena
///
/// Produced once by [`SchemaModelBuilder::build`] and never mutated.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    id: String,
    nodes: Vec<SchemaNode>,
    modules: Vec<NodeId>,
}

impl SchemaModel {
    pub(crate) fn from_parts(id: String, nodes: Vec<SchemaNode>, modules: Vec<NodeId>) -> Self {
        Self { id, nodes, modules }
    }

    /// Start building a model
    pub fn builder(id: impl Into<String>) -> SchemaModelBuilder {
        SchemaModelBuilder::new(id)
    }

    /// Compile a model from its serialized form
    pub fn from_spec(spec: &ModelSpec) -> Result<Self, RuntimeError> {
        spec::compile(spec)
    }

    /// Compile a model from a JSON metadata blob
    pub fn from_json(json: &str) -> Result<Self, RuntimeError> {
        let spec = ModelSpec::from_json(json)?;
        Self::from_spec(&spec)
    }

    /// Identifier of this compiled set
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node(&self, id: NodeId) -> SchemaNodeRef<'_> {
        SchemaNodeRef { model: self, id }
    }

    /// Module nodes in declaration order
    pub fn modules(&self) -> impl Iterator<Item = SchemaNodeRef<'_>> + '_ {
        self.modules.iter().map(move |id| self.node(*id))
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = SchemaNodeRef<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| self.node(NodeId(i)))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a module by name and revision
    pub fn module(&self, name: &str, revision: Option<Revision>) -> Option<SchemaNodeRef<'_>> {
        self.modules()
            .find(|m| m.name() == name && m.revision() == revision)
    }

    fn raw(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }
}

// =============================================================================
// Node handles
// =============================================================================

/// An elided layer between a node and one of its data children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer<'a> {
    /// The child was contributed by an augment of the holder
    Augment(SchemaNodeRef<'a>),
    /// The child sits under `case` of `choice`
    Case {
        choice: SchemaNodeRef<'a>,
        case: SchemaNodeRef<'a>,
    },
}

/// Result of a transparent child lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChild<'a> {
    pub node: SchemaNodeRef<'a>,
    /// Elided layers from the holder down to `node`, outermost first
    pub layers: Vec<Layer<'a>>,
}

/// Borrowed handle to one node of a [`SchemaModel`]
#[derive(Clone, Copy)]
pub struct SchemaNodeRef<'a> {
    model: &'a SchemaModel,
    id: NodeId,
}

impl<'a> SchemaNodeRef<'a> {
    fn raw(&self) -> &'a SchemaNode {
        self.model.raw(self.id)
    }

    fn at(&self, id: NodeId) -> SchemaNodeRef<'a> {
        SchemaNodeRef {
            model: self.model,
            id,
        }
    }

    pub fn model(&self) -> &'a SchemaModel {
        self.model
    }

    pub fn node_id(&self) -> NodeId {
        self.id
    }

    pub fn schema_id(&self) -> &'a SchemaId {
        &self.raw().id
    }

    pub fn name(&self) -> &'a str {
        self.raw().id.name()
    }

    /// Effective namespace (inherited from the nearest ancestor when unset)
    pub fn namespace(&self) -> Option<&'a str> {
        self.raw().id.namespace()
    }

    pub fn kind(&self) -> SchemaNodeKind {
        self.raw().kind
    }

    pub fn revision(&self) -> Option<Revision> {
        self.raw().revision
    }

    pub fn class_name(&self) -> Option<&'a str> {
        self.raw().class_name.as_deref()
    }

    pub fn is_config(&self) -> bool {
        self.raw().config
    }

    /// Declared key leaf names in schema order
    pub fn keys(&self) -> &'a [String] {
        &self.raw().keys
    }

    pub fn parent(&self) -> Option<SchemaNodeRef<'a>> {
        self.raw().parent.map(|id| self.at(id))
    }

    pub fn children(&self) -> impl Iterator<Item = SchemaNodeRef<'a>> + 'a {
        let this = *self;
        self.raw().children.iter().map(move |id| this.at(*id))
    }

    /// Augments targeting this node in compile order
    pub fn augments(&self) -> impl Iterator<Item = SchemaNodeRef<'a>> + 'a {
        let this = *self;
        self.raw().augments.iter().map(move |id| this.at(*id))
    }

    /// Target node of an augment
    pub fn augment_target(&self) -> Option<SchemaNodeRef<'a>> {
        self.raw().target.map(|id| self.at(id))
    }

    /// Module this node was declared in
    pub fn module(&self) -> SchemaNodeRef<'a> {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Nearest ancestor that appears in data trees
    ///
    /// Choice and case are skipped, an augment continues at its target and
    /// the module boundary yields `None`.
    pub fn data_parent(&self) -> Option<SchemaNodeRef<'a>> {
        let mut current = self.parent()?;
        loop {
            match current.kind() {
                SchemaNodeKind::Choice | SchemaNodeKind::Case => current = current.parent()?,
                SchemaNodeKind::Augment => current = current.augment_target()?,
                SchemaNodeKind::Module => return None,
                _ => return Some(current),
            }
        }
    }

    /// Cases of a choice, including cases contributed by augments
    pub fn cases(&self) -> impl Iterator<Item = SchemaNodeRef<'a>> + 'a {
        let declared = self.children().filter(|c| c.kind() == SchemaNodeKind::Case);
        let augmented = self
            .augments()
            .flat_map(|a| a.children())
            .filter(|c| c.kind() == SchemaNodeKind::Case);
        declared.chain(augmented)
    }

    /// Whether this case node belongs to `choice`
    pub fn is_case_of(&self, choice: SchemaNodeRef<'a>) -> bool {
        match self.parent() {
            Some(parent) if parent == choice => true,
            Some(parent) if parent.kind() == SchemaNodeKind::Augment => {
                parent.augment_target() == Some(choice)
            }
            _ => false,
        }
    }

    /// Direct child by name, without any transparency
    pub fn child(&self, name: &str) -> Option<SchemaNodeRef<'a>> {
        self.children().find(|c| c.name() == name)
    }

    /// Find a data child by name and optional namespace
    ///
    /// Searches declared children first, then the node's augments, then
    /// descends through choice/case.
    pub fn find_data_child(&self, name: &str, namespace: Option<&str>) -> Option<DataChild<'a>> {
        let direct = self.children().find(|c| {
            !c.kind().is_transparent()
                && c.kind() != SchemaNodeKind::Augment
                && c.schema_id().matches(name, namespace)
        });
        if let Some(node) = direct {
            return Some(DataChild {
                node,
                layers: Vec::new(),
            });
        }

        for augment in self.augments() {
            if let Some(mut found) = augment.find_data_child(name, namespace) {
                found.layers.insert(0, Layer::Augment(augment));
                return Some(found);
            }
        }

        for choice in self.children().filter(|c| c.kind() == SchemaNodeKind::Choice) {
            for case in choice.cases() {
                if let Some(mut found) = case.find_data_child(name, namespace) {
                    found.layers.insert(0, Layer::Case { choice, case });
                    return Some(found);
                }
            }
        }

        None
    }

    /// Readable schema path for diagnostics
    pub fn path(&self) -> String {
        let mut segments = Vec::new();
        let mut current = Some(*self);
        while let Some(node) = current {
            if node.kind() == SchemaNodeKind::Module {
                break;
            }
            segments.push(node.name().to_string());
            current = match node.kind() {
                SchemaNodeKind::Augment => node.augment_target(),
                _ => node.parent(),
            };
        }
        segments.reverse();
        format!("{}:/{}", self.module().name(), segments.join("/"))
    }
}

impl PartialEq for SchemaNodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.model, other.model) && self.id == other.id
    }
}

impl Eq for SchemaNodeRef<'_> {}

impl Hash for SchemaNodeRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.model as *const SchemaModel as usize).hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for SchemaNodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.path())
    }
}

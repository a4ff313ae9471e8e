//! Schema Registry
//!
//! Multi-revision index over compiled schema models. Modules are looked up by
//! name (optionally `name@revision`) and namespace, schema nodes by the
//! generated class bound to them, and anydata holders by the payload schemas
//! registered for them.
//!
//! The registry is a plain value without internal locking; share it behind a
//! lock (see [`crate::runtime::YangRuntime`]) when registration and
//! conversion run concurrently.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::data::{NodeKeyKind, ResourceId};
use crate::error::{Result, RuntimeError};
use crate::model::TypeDescriptor;
use crate::schema::{DataChild, NodeId, Revision, SchemaModel, SchemaNodeKind, SchemaNodeRef};

/// Location of a node inside a registered model
#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeAddr {
    model: String,
    node: NodeId,
}

#[derive(Debug, Clone)]
struct ClassEntry {
    addr: NodeAddr,
    descriptor: Option<&'static TypeDescriptor>,
}

/// Revisions of one module name (or namespace), `None` for revision-less
///
/// Each revision holds every model declaring it, the latest registration last.
type RevisionStack = BTreeMap<Option<Revision>, Vec<NodeAddr>>;

/// The schema registry
#[derive(Debug, Default)]
pub struct YangModelRegistry {
    config: RegistryConfig,
    models: HashMap<String, Arc<SchemaModel>>,
    /// Registration order of model ids
    order: Vec<String>,
    modules: HashMap<String, RevisionStack>,
    namespaces: HashMap<String, RevisionStack>,
    /// Class -> bound nodes, the latest registration last
    classes: HashMap<String, Vec<ClassEntry>>,
    /// Anydata holder class -> payload classes, in registration order
    anydata: HashMap<String, Vec<String>>,
}

impl YangModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with explicit settings
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a compiled model together with the generated classes bound to it
    ///
    /// Every module is indexed by name, revision and namespace; every node
    /// carrying a class name is indexed by that class. A binding whose class
    /// names no node is rejected under `strict_bindings`, otherwise skipped.
    /// Nothing is indexed when registration fails.
    ///
    /// A module revision or class already provided by another model is
    /// shadowed by this one until it is unregistered.
    pub fn register_model(
        &mut self,
        model: SchemaModel,
        bindings: &[&'static TypeDescriptor],
    ) -> Result<()> {
        let id = model.id().to_string();
        if self.models.contains_key(&id) {
            return Err(RuntimeError::invalid_model(format!(
                "model '{}' is already registered",
                id
            )));
        }

        let mut classes: HashMap<String, ClassEntry> = HashMap::new();
        for node in model.nodes() {
            if let Some(class) = node.class_name() {
                let entry = ClassEntry {
                    addr: NodeAddr {
                        model: id.clone(),
                        node: node.node_id(),
                    },
                    descriptor: None,
                };
                if classes.insert(class.to_string(), entry).is_some() {
                    return Err(RuntimeError::invalid_model(format!(
                        "class '{}' is bound to more than one node of model '{}'",
                        class, id
                    )));
                }
            }
        }

        for descriptor in bindings {
            match classes.get_mut(descriptor.class_name) {
                Some(entry) => entry.descriptor = Some(*descriptor),
                None if self.config.strict_bindings => {
                    return Err(RuntimeError::invalid_model(format!(
                        "class binding '{}' names no node of model '{}'",
                        descriptor.class_name, id
                    )));
                }
                None => {
                    warn!(class = descriptor.class_name, model = %id, "skipping unbound class")
                }
            }
        }

        for module in model.modules() {
            let addr = NodeAddr {
                model: id.clone(),
                node: module.node_id(),
            };
            let revision = module.revision();
            if let Some(ns) = module.namespace() {
                self.namespaces
                    .entry(ns.to_string())
                    .or_default()
                    .entry(revision)
                    .or_default()
                    .push(addr.clone());
            }
            let providers = self
                .modules
                .entry(module.name().to_string())
                .or_default()
                .entry(revision)
                .or_default();
            if let Some(shadowed) = providers.last() {
                warn!(
                    module = module.name(),
                    revision = ?revision,
                    shadowed = %shadowed.model,
                    "module revision registered again, shadowing"
                );
            }
            providers.push(addr);
            debug!(module = module.name(), revision = ?revision, model = %id, "registered module");
        }

        let bound = classes.values().filter(|c| c.descriptor.is_some()).count();
        debug!(model = %id, classes = classes.len(), bound, "registered model");
        for (class, entry) in classes {
            let providers = self.classes.entry(class.clone()).or_default();
            if let Some(shadowed) = providers.last() {
                warn!(
                    class = %class,
                    model = %entry.addr.model,
                    shadowed = %shadowed.addr.model,
                    "class bound again, shadowing"
                );
            }
            providers.push(entry);
        }
        self.order.push(id.clone());
        self.models.insert(id, Arc::new(model));
        Ok(())
    }

    /// Remove a model and every entry it contributed
    ///
    /// Entries of other models, including other revisions of the same module
    /// names, are left untouched.
    pub fn unregister_model(&mut self, model_id: &str) -> Option<Arc<SchemaModel>> {
        let model = self.models.remove(model_id)?;
        self.order.retain(|id| id != model_id);

        for index in [&mut self.modules, &mut self.namespaces] {
            index.retain(|_, stack| {
                stack.retain(|_, providers| {
                    providers.retain(|addr| addr.model != model_id);
                    !providers.is_empty()
                });
                !stack.is_empty()
            });
        }

        // Classes no longer bound anywhere lose their anydata bindings too
        let mut removed: Vec<String> = Vec::new();
        self.classes.retain(|class, providers| {
            providers.retain(|entry| entry.addr.model != model_id);
            if providers.is_empty() {
                removed.push(class.clone());
            }
            !providers.is_empty()
        });
        for class in &removed {
            self.anydata.remove(class);
        }
        for payloads in self.anydata.values_mut() {
            payloads.retain(|p| !removed.contains(p));
        }
        self.anydata.retain(|_, payloads| !payloads.is_empty());

        debug!(model = model_id, classes = removed.len(), "unregistered model");
        Some(model)
    }

    /// Bind a payload schema to an anydata holder
    pub fn register_anydata_schema(
        &mut self,
        holder_class: &str,
        payload_class: &str,
    ) -> Result<()> {
        let holder = self
            .get_for_reg_class_name(holder_class)
            .ok_or_else(|| {
                RuntimeError::resolution(format!("no schema node for class '{}'", holder_class))
            })?;
        if holder.kind() != SchemaNodeKind::Anydata {
            return Err(RuntimeError::invalid_model(format!(
                "class '{}' is bound to {} '{}', not to an anydata node",
                holder_class,
                holder.kind(),
                holder.name()
            )));
        }
        let payload = self
            .get_for_reg_class_name(payload_class)
            .ok_or_else(|| {
                RuntimeError::resolution(format!("no schema node for class '{}'", payload_class))
            })?;
        if payload.kind().is_leaf_like() {
            return Err(RuntimeError::invalid_model(format!(
                "anydata payload '{}' must be an inner node",
                payload_class
            )));
        }

        let payloads = self.anydata.entry(holder_class.to_string()).or_default();
        if !payloads.iter().any(|p| p == payload_class) {
            payloads.push(payload_class.to_string());
        }
        debug!(holder = holder_class, payload = payload_class, "registered anydata schema");
        Ok(())
    }

    /// Remove one anydata binding; returns whether it existed
    pub fn unregister_anydata_schema(&mut self, holder_class: &str, payload_class: &str) -> bool {
        let Some(payloads) = self.anydata.get_mut(holder_class) else {
            return false;
        };
        let before = payloads.len();
        payloads.retain(|p| p != payload_class);
        let removed = payloads.len() != before;
        if payloads.is_empty() {
            self.anydata.remove(holder_class);
        }
        removed
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    fn node(&self, addr: &NodeAddr) -> Option<SchemaNodeRef<'_>> {
        self.models.get(&addr.model).map(|m| m.node(addr.node))
    }

    /// Revision-less entry when present, else the newest revision
    fn select<'s>(&'s self, stack: &'s RevisionStack) -> Option<SchemaNodeRef<'s>> {
        stack
            .get(&None)
            .or_else(|| stack.values().next_back())
            .and_then(|providers| providers.last())
            .and_then(|addr| self.node(addr))
    }

    fn class_entry(&self, class_name: &str) -> Option<&ClassEntry> {
        self.classes.get(class_name).and_then(|providers| providers.last())
    }

    /// Module by `name` or `name@revision`
    pub fn get_for_schema_name(&self, schema_name: &str) -> Option<SchemaNodeRef<'_>> {
        match schema_name.split_once('@') {
            Some((name, revision)) => {
                let revision = Revision::parse(revision).ok()?;
                self.modules
                    .get(name)?
                    .get(&Some(revision))
                    .and_then(|providers| providers.last())
                    .and_then(|addr| self.node(addr))
            }
            None => self.select(self.modules.get(schema_name)?),
        }
    }

    /// Schema node bound to a generated class
    pub fn get_for_reg_class_name(&self, class_name: &str) -> Option<SchemaNodeRef<'_>> {
        self.class_entry(class_name).and_then(|entry| self.node(&entry.addr))
    }

    /// Module declaring `namespace`
    ///
    /// Unless `include_rpc_or_notification` is set, modules whose top-level
    /// nodes are all rpcs or notifications are not returned.
    pub fn get_for_namespace(
        &self,
        namespace: &str,
        include_rpc_or_notification: bool,
    ) -> Option<SchemaNodeRef<'_>> {
        let module = self.select(self.namespaces.get(namespace)?)?;
        if include_rpc_or_notification {
            return Some(module);
        }
        let mut top = module.children().filter(|c| c.kind() != SchemaNodeKind::Augment).peekable();
        if top.peek().is_some() && top.all(|c| c.kind().is_rpc_or_notification()) {
            return None;
        }
        Some(module)
    }

    /// Runtime descriptor of a generated class
    pub fn descriptor(&self, class_name: &str) -> Option<&'static TypeDescriptor> {
        self.class_entry(class_name).and_then(|entry| entry.descriptor)
    }

    /// Runtime descriptor of the class bound to a schema node
    pub fn descriptor_for(&self, node: SchemaNodeRef<'_>) -> Option<&'static TypeDescriptor> {
        node.class_name().and_then(|class| self.descriptor(class))
    }

    /// Payload schema registered for an anydata holder
    pub fn anydata_payload(
        &self,
        holder_class: &str,
        payload_class: &str,
    ) -> Option<SchemaNodeRef<'_>> {
        self.anydata
            .get(holder_class)?
            .iter()
            .find(|p| *p == payload_class)
            .and_then(|p| self.get_for_reg_class_name(p))
    }

    /// Payload schema of an anydata holder by payload node name
    pub fn anydata_payload_for(
        &self,
        holder_class: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Option<SchemaNodeRef<'_>> {
        self.anydata
            .get(holder_class)?
            .iter()
            .filter_map(|p| self.get_for_reg_class_name(p))
            .find(|node| node.schema_id().matches(name, namespace))
    }

    /// Registered modules, sorted by name then revision
    pub fn modules(&self) -> Vec<SchemaNodeRef<'_>> {
        let mut names: Vec<&String> = self.modules.keys().collect();
        names.sort();
        names
            .into_iter()
            .flat_map(|name| self.modules[name].values())
            .filter_map(|providers| providers.last())
            .filter_map(|addr| self.node(addr))
            .collect()
    }

    /// Registered models in registration order
    pub fn models(&self) -> impl Iterator<Item = &Arc<SchemaModel>> + '_ {
        self.order.iter().filter_map(|id| self.models.get(id))
    }

    pub fn model(&self, model_id: &str) -> Option<&Arc<SchemaModel>> {
        self.models.get(model_id)
    }

    // =========================================================================
    // Child resolution
    // =========================================================================

    /// Top-level data node of any registered module
    ///
    /// With a namespace the module declaring it is searched first. Otherwise
    /// modules are tried by name, each at its selected revision.
    pub fn find_top_level(&self, name: &str, namespace: Option<&str>) -> Option<DataChild<'_>> {
        if let Some(ns) = namespace {
            if let Some(found) = self
                .namespaces
                .get(ns)
                .and_then(|stack| self.select(stack))
                .and_then(|module| module.find_data_child(name, Some(ns)))
            {
                return Some(found);
            }
        }
        let mut names: Vec<&String> = self.modules.keys().collect();
        names.sort();
        names
            .into_iter()
            .filter_map(|module| self.select(&self.modules[module]))
            .find_map(|module| module.find_data_child(name, namespace))
    }

    /// Data child of `parent`, or a top-level node when `parent` is `None`
    ///
    /// Below an anydata node the registered payload schemas are searched.
    pub fn resolve_data_child<'a>(
        &'a self,
        parent: Option<SchemaNodeRef<'a>>,
        name: &str,
        namespace: Option<&str>,
    ) -> Option<DataChild<'a>> {
        match parent {
            None => self.find_top_level(name, namespace),
            Some(node) if node.kind() == SchemaNodeKind::Anydata => {
                let holder = node.class_name()?;
                self.anydata_payload_for(holder, name, namespace).map(|node| DataChild {
                    node,
                    layers: Vec::new(),
                })
            }
            Some(node) => node.find_data_child(name, namespace),
        }
    }

    /// Resolve a child, preferring `inherited` when no namespace is given
    ///
    /// A name defined both in the parent's namespace and by a foreign
    /// augment resolves to the former.
    pub fn resolve_preferring<'a>(
        &'a self,
        parent: Option<SchemaNodeRef<'a>>,
        name: &str,
        namespace: Option<&str>,
        inherited: Option<&str>,
    ) -> Option<DataChild<'a>> {
        if namespace.is_some() {
            return self.resolve_data_child(parent, name, namespace);
        }
        inherited
            .and_then(|ns| self.resolve_data_child(parent, name, Some(ns)))
            .or_else(|| self.resolve_data_child(parent, name, None))
    }

    /// Schema node addressed by a resource id, `None` for the root
    pub fn resolve_resource_id(&self, id: &ResourceId) -> Result<Option<SchemaNodeRef<'_>>> {
        let mut current: Option<SchemaNodeRef<'_>> = None;
        for key in id.segments() {
            let inherited = current.and_then(|c| c.namespace());
            let child = self
                .resolve_preferring(current, key.name(), key.namespace(), inherited)
                .ok_or_else(|| {
                    RuntimeError::resolution(format!("no schema node for '{}' in {}", key, id))
                })?
                .node;
            let expected = match child.kind() {
                SchemaNodeKind::List => matches!(key.kind(), NodeKeyKind::List(_)),
                SchemaNodeKind::LeafList => !matches!(key.kind(), NodeKeyKind::List(_)),
                _ => matches!(key.kind(), NodeKeyKind::Single),
            };
            if !expected {
                return Err(RuntimeError::structural(format!(
                    "key '{}' does not match {} '{}'",
                    key,
                    child.kind(),
                    child.name()
                )));
            }
            current = Some(child);
        }
        Ok(current)
    }
}

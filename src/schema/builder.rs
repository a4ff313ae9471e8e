//! Schema Model Builder
//!
//! Programmatic construction of a compiled [`SchemaModel`]. This is the
//! boundary the external schema compiler feeds: it declares modules, their
//! children in order, list keys, augments and the generated class attached to
//! each node. `build` checks the structural rules the runtime relies on and
//! resolves effective namespaces.

use super::{NodeId, Revision, SchemaId, SchemaModel, SchemaNode, SchemaNodeKind};
use crate::error::{Result, RuntimeError};

/// Builder for a [`SchemaModel`]
#[derive(Debug)]
pub struct SchemaModelBuilder {
    id: String,
    nodes: Vec<SchemaNode>,
    /// Namespace declared on each node, before inheritance
    declared: Vec<Option<String>>,
    modules: Vec<NodeId>,
}

impl SchemaModelBuilder {
    /// Create a builder for a model with the given identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
            declared: Vec::new(),
            modules: Vec::new(),
        }
    }

    fn push(
        &mut self,
        name: String,
        kind: SchemaNodeKind,
        namespace: Option<String>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SchemaNode {
            id: SchemaId::new(name, None),
            kind,
            revision: None,
            parent,
            children: Vec::new(),
            keys: Vec::new(),
            augments: Vec::new(),
            target: None,
            class_name: None,
            config: true,
        });
        self.declared.push(namespace);
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SchemaNode> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| RuntimeError::invalid_model(format!("unknown node id {}", id.0)))
    }

    fn node(&self, id: NodeId) -> Result<&SchemaNode> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| RuntimeError::invalid_model(format!("unknown node id {}", id.0)))
    }

    /// Declare a module
    pub fn module(
        &mut self,
        name: impl Into<String>,
        namespace: impl Into<String>,
        revision: Option<Revision>,
    ) -> NodeId {
        let id = self.push(name.into(), SchemaNodeKind::Module, Some(namespace.into()), None);
        self.nodes[id.0].revision = revision;
        self.modules.push(id);
        id
    }

    /// Declare a child of `parent`
    pub fn child(
        &mut self,
        parent: NodeId,
        kind: SchemaNodeKind,
        name: impl Into<String>,
    ) -> Result<NodeId> {
        let name = name.into();
        let parent_kind = self.node(parent)?.kind;

        let allowed = match kind {
            SchemaNodeKind::Module | SchemaNodeKind::Augment => false,
            SchemaNodeKind::Case => {
                matches!(parent_kind, SchemaNodeKind::Choice | SchemaNodeKind::Augment)
            }
            SchemaNodeKind::Input | SchemaNodeKind::Output => parent_kind == SchemaNodeKind::Rpc,
            SchemaNodeKind::Rpc => parent_kind == SchemaNodeKind::Module,
            _ => parent_kind.can_hold_children()
                && !matches!(parent_kind, SchemaNodeKind::Choice | SchemaNodeKind::Rpc),
        };
        if !allowed {
            return Err(RuntimeError::invalid_model(format!(
                "{} '{}' cannot be declared under a {}",
                kind, name, parent_kind
            )));
        }

        Ok(self.push(name, kind, None, Some(parent)))
    }

    /// Declare an augment in `module` targeting `target`
    ///
    /// The augment's children take the augmenting module's namespace.
    pub fn augment(&mut self, module: NodeId, target: NodeId) -> Result<NodeId> {
        if self.node(module)?.kind != SchemaNodeKind::Module {
            return Err(RuntimeError::invalid_model("augments must be declared on a module"));
        }
        let target_kind = self.node(target)?.kind;
        if !target_kind.can_hold_children() || target_kind == SchemaNodeKind::Module {
            return Err(RuntimeError::invalid_model(format!(
                "a {} cannot be the target of an augment",
                target_kind
            )));
        }

        let name = self.target_path(target);
        let id = self.push(name, SchemaNodeKind::Augment, None, Some(module));
        self.nodes[id.0].target = Some(target);
        self.nodes[target.0].augments.push(id);
        Ok(id)
    }

    /// Attach the generated class name of a node
    pub fn set_class(&mut self, node: NodeId, class_name: impl Into<String>) -> Result<&mut Self> {
        self.node_mut(node)?.class_name = Some(class_name.into());
        Ok(self)
    }

    /// Declare the key leaves of a list in schema order
    pub fn set_keys(&mut self, list: NodeId, keys: &[&str]) -> Result<&mut Self> {
        let node = self.node_mut(list)?;
        if node.kind != SchemaNodeKind::List {
            return Err(RuntimeError::invalid_model(format!(
                "keys declared on {} '{}'",
                node.kind,
                node.id.name()
            )));
        }
        node.keys = keys.iter().map(|k| k.to_string()).collect();
        Ok(self)
    }

    /// Override the namespace of a node (and its subtree)
    pub fn set_namespace(
        &mut self,
        node: NodeId,
        namespace: impl Into<String>,
    ) -> Result<&mut Self> {
        self.node(node)?;
        self.declared[node.0] = Some(namespace.into());
        Ok(self)
    }

    /// Mark a node as state data (`config false`)
    pub fn set_config(&mut self, node: NodeId, config: bool) -> Result<&mut Self> {
        self.node_mut(node)?.config = config;
        Ok(self)
    }

    /// Module lookup by name and revision
    pub fn find_module(&self, name: &str, revision: Option<Revision>) -> Option<NodeId> {
        self.modules
            .iter()
            .copied()
            .find(|m| self.nodes[m.0].id.name() == name && self.nodes[m.0].revision == revision)
    }

    /// Resolve an absolute schema node path such as `/mod-a:cont1/mod-a:cont2`
    ///
    /// Segment prefixes are module names. Choice and case names are part of
    /// the path, and nodes contributed by augments are reachable.
    pub fn resolve_path(&self, path: &str) -> Result<NodeId> {
        let not_found = || RuntimeError::invalid_model(format!(
            "schema path '{}' does not resolve",
            path
        ));
        let mut segments = path.trim_start_matches('/').split('/').filter(|s| !s.is_empty());

        let first = segments.next().ok_or_else(not_found)?;
        let (prefix, name) = split_prefix(first);
        let mut current = self
            .modules
            .iter()
            .copied()
            .filter(|m| prefix.map_or(true, |p| self.nodes[m.0].id.name() == p))
            .find_map(|m| self.lookup(m, name))
            .ok_or_else(not_found)?;

        for segment in segments {
            let (_, name) = split_prefix(segment);
            current = self.lookup(current, name).ok_or_else(not_found)?;
        }
        Ok(current)
    }

    fn lookup(&self, holder: NodeId, name: &str) -> Option<NodeId> {
        let node = &self.nodes[holder.0];
        node.children
            .iter()
            .copied()
            .filter(|c| self.nodes[c.0].kind != SchemaNodeKind::Augment)
            .find(|c| self.nodes[c.0].id.name() == name)
            .or_else(|| {
                node.augments
                    .iter()
                    .flat_map(|a| self.nodes[a.0].children.iter().copied())
                    .find(|c| self.nodes[c.0].id.name() == name)
            })
    }

    fn target_path(&self, target: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            match node.kind {
                SchemaNodeKind::Module => break,
                SchemaNodeKind::Augment => current = node.target,
                _ => {
                    segments.push(node.id.name().to_string());
                    current = node.parent;
                }
            }
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// Validate and freeze the model
    pub fn build(mut self) -> Result<SchemaModel> {
        if self.modules.is_empty() {
            return Err(RuntimeError::invalid_model(format!(
                "model '{}' declares no modules",
                self.id
            )));
        }

        // parents are always created before their children
        for i in 0..self.nodes.len() {
            let inherited = self.nodes[i]
                .parent
                .and_then(|p| self.nodes[p.0].id.namespace().map(str::to_string));
            let namespace = self.declared[i].clone().or(inherited);
            let name = self.nodes[i].id.name().to_string();
            self.nodes[i].id = SchemaId::new(name, namespace);
        }

        for node in &self.nodes {
            if node.kind != SchemaNodeKind::List {
                continue;
            }
            for key in &node.keys {
                let declared = node.children.iter().any(|c| {
                    let child = &self.nodes[c.0];
                    child.kind == SchemaNodeKind::Leaf && child.id.name() == key
                });
                if !declared {
                    return Err(RuntimeError::invalid_model(format!(
                        "list '{}' declares key '{}' that is not one of its leaves",
                        node.id.name(),
                        key
                    )));
                }
            }
        }

        Ok(SchemaModel::from_parts(self.id, self.nodes, self.modules))
    }
}

fn split_prefix(segment: &str) -> (Option<&str>, &str) {
    match segment.split_once(':') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, segment),
    }
}

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RpcError;
use crate::handler::MethodHandler;

/// A node of the method tree.
///
/// Child namespaces and handlers live in separate maps, so one name may be
/// registered as both. Children are owned, which keeps the tree acyclic.
#[derive(Default, Clone)]
pub struct Namespace {
    namespaces: HashMap<String, Namespace>,
    handlers: HashMap<String, Arc<dyn MethodHandler>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a child namespace, replacing any previous one of that name.
    pub fn register_namespace(&mut self, name: impl Into<String>, namespace: Namespace) {
        self.namespaces.insert(name.into(), namespace);
    }

    /// Register a handler, replacing any previous one of that name.
    pub fn register_handler<H>(&mut self, name: impl Into<String>, handler: H)
    where
        H: MethodHandler + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    pub fn with_namespace(mut self, name: impl Into<String>, namespace: Namespace) -> Self {
        self.register_namespace(name, namespace);
        self
    }

    pub fn with_handler<H>(mut self, name: impl Into<String>, handler: H) -> Self
    where
        H: MethodHandler + 'static,
    {
        self.register_handler(name, handler);
        self
    }

    /// Child namespace for further registration, created empty if absent.
    pub fn namespace_mut(&mut self, name: impl Into<String>) -> &mut Namespace {
        self.namespaces.entry(name.into()).or_default()
    }

    pub fn lookup_namespace(&self, name: &str) -> Result<&Namespace, RpcError> {
        self.namespaces
            .get(name)
            .ok_or_else(|| RpcError::namespace_not_found(name))
    }

    pub fn lookup_handler(&self, name: &str) -> Result<&Arc<dyn MethodHandler>, RpcError> {
        self.handlers
            .get(name)
            .ok_or_else(|| RpcError::method_not_found(name))
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty() && self.handlers.is_empty()
    }

    /// Every callable path below this node, joined with `separator`, sorted.
    pub fn registered_methods(&self, separator: &str) -> Vec<String> {
        let mut methods = Vec::new();
        let mut pending: Vec<(String, &Namespace)> = vec![(String::new(), self)];

        while let Some((prefix, node)) = pending.pop() {
            for name in node.handlers.keys() {
                methods.push(format!("{}{}", prefix, name));
            }
            for (name, child) in &node.namespaces {
                pending.push((format!("{}{}{}", prefix, name, separator), child));
            }
        }

        methods.sort();
        methods
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&String> = self.handlers.keys().collect();
        handlers.sort();
        f.debug_struct("Namespace")
            .field("namespaces", &self.namespaces)
            .field("handlers", &handlers)
            .finish()
    }
}

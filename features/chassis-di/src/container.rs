use std::{collections::HashMap, fmt::Debug, rc::Rc};

use crate::{
    errors::ResolveError,
    types::{FactoryFn, Instance},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BindingKind {
    /// A new instance per resolution
    Transient,
    /// Built once, then shared regardless of arguments
    Singleton,
}

/// One registered binding.
///
/// The singleton state machine lives in the `kind`/`cached` pair: `cached`
/// fills exactly once, on first resolution, and wins ever after.
#[derive(Clone)]
pub struct Binding {
    pub factory: Rc<FactoryFn>,
    pub kind: BindingKind,
    pub cached: Option<Instance>,
    pub tags: Vec<String>,
}

impl Binding {
    pub fn new(factory: Rc<FactoryFn>, kind: BindingKind, tags: &[&str]) -> Self {
        Binding {
            factory,
            kind,
            cached: None,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

/// Container holding all bindings - pure storage, no resolution logic.
pub struct Container {
    bindings: HashMap<String, Binding>,
    /// First-registration order, drives tag enumeration
    order: Vec<String>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    pub fn new() -> Self {
        Container {
            bindings: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn has(&self, abstract_name: &str) -> bool {
        self.bindings.contains_key(abstract_name)
    }

    /// Stores a binding, overwriting any previous one (last write wins).
    /// An overwrite keeps the abstract's original enumeration slot.
    pub fn set(&mut self, abstract_name: impl Into<String>, binding: Binding) {
        let abstract_name = abstract_name.into();
        if self.bindings.insert(abstract_name.clone(), binding).is_none() {
            self.order.push(abstract_name);
        }
    }

    pub fn get(&self, abstract_name: &str) -> Result<&Binding, ResolveError> {
        self.bindings
            .get(abstract_name)
            .ok_or_else(|| ResolveError::NotBound(abstract_name.to_string()))
    }

    /// All abstracts whose tags include `tag`, in first-registration order.
    pub fn by_tag(&self, tag: &str) -> Vec<String> {
        self.order
            .iter()
            .filter(|name| {
                self.bindings
                    .get(*name)
                    .map(|binding| binding.tags.iter().any(|t| t == tag))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Fills a singleton's cache slot after its first resolution.
    pub(crate) fn cache(&mut self, abstract_name: &str, instance: Instance) {
        if let Some(binding) = self.bindings.get_mut(abstract_name) {
            binding.cached = Some(instance);
        }
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Container");
        for name in &self.order {
            if let Some(binding) = self.bindings.get(name) {
                let state = match (binding.kind, binding.cached.is_some()) {
                    (BindingKind::Transient, _) => "transient",
                    (BindingKind::Singleton, false) => "singleton (pending)",
                    (BindingKind::Singleton, true) => "singleton (cached)",
                };
                map.field(name, &state);
            }
        }
        map.finish()
    }
}

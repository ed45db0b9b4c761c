use std::{
    any::{type_name, Any},
    collections::HashMap,
    fmt::Debug,
    rc::Rc,
};

use crate::{app::App, errors::ResolveError};

/// A resolved service value, type-erased for container storage.
///
/// Cloning an [Instance] clones the handle, not the value - a singleton
/// stays one object no matter how many times it is handed out.
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    value: Rc<dyn Any>,
}

impl Instance {
    pub fn new<T: 'static>(value: T) -> Self {
        Instance {
            type_name: type_name::<T>(),
            value: Rc::new(value),
        }
    }

    /// Wraps an already shared value without re-boxing it.
    pub fn from_rc<T: 'static>(value: Rc<T>) -> Self {
        Instance {
            type_name: type_name::<T>(),
            value,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast<T: 'static>(&self) -> Result<Rc<T>, &'static str> {
        match Rc::downcast::<T>(self.value.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.type_name),
        }
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.type_name).finish()
    }
}

/// Named explicit overrides passed to a resolution call.
///
/// Values present here beat both association defaults and container
/// bindings when an autowired factory fills its dependency manifest.
#[derive(Clone, Default)]
pub struct Args {
    values: HashMap<String, Instance>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: 'static>(mut self, name: impl Into<String>, value: T) -> Self {
        self.values.insert(name.into(), Instance::new(value));
        self
    }

    pub fn with_instance(mut self, name: impl Into<String>, instance: Instance) -> Self {
        self.values.insert(name.into(), instance);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl IntoIterator for Args {
    type Item = (String, Instance);
    type IntoIter = std::collections::hash_map::IntoIter<String, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// The stored shape of every binding's factory.
pub type FactoryFn = dyn Fn(&App, &Args) -> Result<Instance, ResolveError>;

use std::{
    any::type_name,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use crate::{errors::DynError, types::Instance};

type ConstructorFn = dyn Fn(Deps) -> Result<Instance, DynError>;

/// A loadable unit the resolver falls back to when an abstract has no
/// explicit binding and the implicit "abstract name = module name" rule
/// applies.
///
/// A module either carries a ready value, or a constructor with an ordered
/// dependency manifest. Manifest entries name the abstracts (or argument
/// keys) each positional constructor slot is filled from.
#[derive(Clone)]
pub struct Module {
    name: String,
    kind: ModuleKind,
}

#[derive(Clone)]
pub(crate) enum ModuleKind {
    /// No constructor - the registered value itself is the resolution
    /// result, shared on every make
    Value(Instance),
    Constructor {
        params: Rc<Vec<String>>,
        build: Rc<ConstructorFn>,
    },
}

impl Module {
    /// A module without a constructor.
    pub fn value<T: 'static>(name: impl Into<String>, value: T) -> Self {
        Module {
            name: name.into(),
            kind: ModuleKind::Value(Instance::new(value)),
        }
    }

    /// A module built by `build` from the dependencies named in `params`,
    /// handed over positionally in manifest order.
    pub fn new<T, F>(name: impl Into<String>, params: &[&str], build: F) -> Self
    where
        T: 'static,
        F: Fn(Deps) -> Result<T, DynError> + 'static,
    {
        Module {
            name: name.into(),
            kind: ModuleKind::Constructor {
                params: Rc::new(params.iter().map(|param| param.to_string()).collect()),
                build: Rc::new(move |deps| build(deps).map(Instance::new)),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn kind(&self) -> &ModuleKind {
        &self.kind
    }
}

/// Positionally resolved dependencies handed to a module constructor.
pub struct Deps {
    values: VecDeque<Instance>,
}

impl Deps {
    pub(crate) fn new(values: Vec<Instance>) -> Self {
        Deps {
            values: values.into(),
        }
    }

    /// Takes the next dependency, downcast to its concrete type.
    pub fn take<T: 'static>(&mut self) -> Result<Rc<T>, DynError> {
        let instance = self.take_instance()?;
        instance.downcast::<T>().map_err(|actual| {
            format!(
                "expected a '{}' but the next dependency is a '{}'",
                type_name::<T>(),
                actual
            )
            .into()
        })
    }

    /// Takes the next dependency without downcasting.
    pub fn take_instance(&mut self) -> Result<Instance, DynError> {
        self.values
            .pop_front()
            .ok_or_else(|| "constructor took more dependencies than its manifest declares".into())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Explicit registry of modules, keyed by the identifier strings that
/// double as implicit abstract names. Populated at process start instead
/// of lazily through a generic loader.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Module>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: Module) {
        self.modules.insert(module.name().to_string(), module);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Clones the module out so no registry borrow is held while its
    /// constructor runs.
    pub fn get(&self, name: &str) -> Option<Module> {
        self.modules.get(name).cloned()
    }
}

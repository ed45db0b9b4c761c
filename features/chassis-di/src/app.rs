use std::{
    any::type_name,
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use crate::{
    container::{Binding, BindingKind, Container},
    errors::{BootError, MissingCapabilities, ResolveError, StartError},
    modules::{Module, ModuleRegistry},
    provider::AppOptions,
    resolver,
    types::{Args, FactoryFn, Instance},
};

/// Abstract under which [boot](App::boot) expects its [AppOptions].
pub const OPTIONS: &str = "options";

/// What callers hand to the binding verbs: the name of a registered
/// module (autowired on resolution) or a ready factory closure.
///
/// Plain strings convert into the module form, so
/// `app.bind("db", "db", &[])` reads as "bind abstract db to module db".
pub enum Factory {
    Module(String),
    Func(Rc<FactoryFn>),
}

impl Factory {
    pub fn func<F>(factory: F) -> Self
    where
        F: Fn(&App, &Args) -> Result<Instance, ResolveError> + 'static,
    {
        Factory::Func(Rc::new(factory))
    }
}

impl From<&str> for Factory {
    fn from(module_name: &str) -> Self {
        Factory::Module(module_name.to_string())
    }
}

impl From<String> for Factory {
    fn from(module_name: String) -> Self {
        Factory::Module(module_name)
    }
}

/// Lifecycle phases - a single forward path, no re-entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Unbooted,
    Booted,
    TornDown,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Unbooted => "unbooted",
            Phase::Booted => "booted",
            Phase::TornDown => "torn down",
        })
    }
}

struct Capability {
    name: String,
    probe: Box<dyn Fn() -> bool>,
}

/// Facade over one [Container] plus the provider lifecycle driver.
///
/// Everything mutates through `&self`: the app lives on the host's single
/// logical thread and factories re-enter it while resolving their own
/// dependencies, so no borrow is held across a factory invocation.
pub struct App {
    container: RefCell<Container>,
    modules: RefCell<ModuleRegistry>,
    /// Per-abstract default parameter values for autowiring
    associations: RefCell<HashMap<String, HashMap<String, Instance>>>,
    capabilities: RefCell<Vec<Capability>>,
    /// Abstracts currently being resolved, outermost first
    resolving: RefCell<Vec<String>>,
    phase: Cell<Phase>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        App {
            container: RefCell::new(Container::new()),
            modules: RefCell::new(ModuleRegistry::new()),
            associations: RefCell::new(HashMap::new()),
            capabilities: RefCell::new(Vec::new()),
            resolving: RefCell::new(Vec::new()),
            phase: Cell::new(Phase::Unbooted),
        }
    }

    /// Registers a module the resolver may fall back to, by name.
    pub fn register_module(&self, module: Module) {
        tracing::debug!("Registering module '{}'", module.name());
        self.modules.borrow_mut().insert(module);
    }

    pub(crate) fn module(&self, name: &str) -> Option<Module> {
        self.modules.borrow().get(name)
    }

    pub(crate) fn associations_for(&self, abstract_name: &str) -> HashMap<String, Instance> {
        self.associations
            .borrow()
            .get(abstract_name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has(&self, abstract_name: &str) -> bool {
        self.container.borrow().has(abstract_name)
    }

    // ── Binding verbs ──

    /// Registers a transient binding: a new instance per resolution.
    pub fn bind(&self, abstract_name: &str, factory: impl Into<Factory>, tags: &[&str]) {
        self.set(abstract_name, factory.into(), BindingKind::Transient, tags);
    }

    /// Like [bind](App::bind), but a no-op if the abstract is already
    /// bound - package defaults the user may override.
    pub fn bind_if(&self, abstract_name: &str, factory: impl Into<Factory>, tags: &[&str]) {
        if !self.has(abstract_name) {
            self.bind(abstract_name, factory, tags);
        }
    }

    /// Registers a binding built once on first resolution and shared ever
    /// after, regardless of the arguments later calls pass.
    pub fn singleton(&self, abstract_name: &str, factory: impl Into<Factory>, tags: &[&str]) {
        self.set(abstract_name, factory.into(), BindingKind::Singleton, tags);
    }

    pub fn singleton_if(&self, abstract_name: &str, factory: impl Into<Factory>, tags: &[&str]) {
        if !self.has(abstract_name) {
            self.singleton(abstract_name, factory, tags);
        }
    }

    /// Registers an externally constructed value; its factory returns the
    /// same instance unconditionally.
    pub fn instance(&self, abstract_name: &str, value: Instance, tags: &[&str]) {
        tracing::debug!("Binding '{}' to an existing {:?}", abstract_name, value);
        let factory: Rc<FactoryFn> = Rc::new(move |_, _| Ok(value.clone()));
        self.container
            .borrow_mut()
            .set(abstract_name, Binding::new(factory, BindingKind::Transient, tags));
    }

    /// Merges default parameter values consulted when autowiring the
    /// abstract's module factory. Shallow merge, later keys win.
    pub fn associate(&self, abstract_name: &str, defaults: Args) {
        let mut associations = self.associations.borrow_mut();
        let entry = associations.entry(abstract_name.to_string()).or_default();
        for (name, value) in defaults {
            entry.insert(name, value);
        }
    }

    fn set(&self, abstract_name: &str, factory: Factory, kind: BindingKind, tags: &[&str]) {
        let factory = match factory {
            Factory::Module(module_name) => {
                resolver::module_factory(abstract_name.to_string(), module_name)
            }
            Factory::Func(factory) => factory,
        };
        tracing::debug!("Binding '{}' as {:?}", abstract_name, kind);
        self.container
            .borrow_mut()
            .set(abstract_name, Binding::new(factory, kind, tags));
    }

    // ── Resolution ──

    /// Resolves an abstract into an instance.
    ///
    /// An unbound abstract whose name matches a registered module is
    /// implicitly bound to it first; that binding is permanent. An
    /// unbound abstract matching no module fails without mutating the
    /// container.
    pub fn make(&self, abstract_name: &str, args: &Args) -> Result<Instance, ResolveError> {
        if !self.has(abstract_name) {
            let known_module = self.modules.borrow().contains(abstract_name);
            if !known_module {
                return Err(ResolveError::ModuleNotFound(abstract_name.to_string()));
            }
            tracing::debug!("Implicitly binding '{}' to the module of the same name", abstract_name);
            self.bind(abstract_name, Factory::Module(abstract_name.to_string()), &[]);
        }

        {
            let resolving = self.resolving.borrow();
            if resolving.iter().any(|name| name == abstract_name) {
                let mut chain = resolving.clone();
                chain.push(abstract_name.to_string());
                return Err(ResolveError::CircularDependency {
                    from: resolving.last().cloned().unwrap_or_default(),
                    to: abstract_name.to_string(),
                    chain,
                });
            }
        }

        self.resolving.borrow_mut().push(abstract_name.to_string());
        let result = self.resolve_binding(abstract_name, args);
        self.resolving.borrow_mut().pop();
        result
    }

    fn resolve_binding(&self, abstract_name: &str, args: &Args) -> Result<Instance, ResolveError> {
        let (factory, kind, cached) = {
            let container = self.container.borrow();
            let binding = container.get(abstract_name)?;
            (binding.factory.clone(), binding.kind, binding.cached.clone())
        };

        if let Some(instance) = cached {
            return Ok(instance);
        }

        let instance = factory(self, args)?;
        if kind == BindingKind::Singleton {
            tracing::debug!("Caching singleton '{}'", abstract_name);
            self.container.borrow_mut().cache(abstract_name, instance.clone());
        }
        Ok(instance)
    }

    /// [make](App::make) plus a downcast to the concrete type.
    pub fn make_as<T: 'static>(
        &self,
        abstract_name: &str,
        args: &Args,
    ) -> Result<Rc<T>, ResolveError> {
        let instance = self.make(abstract_name, args)?;
        instance
            .downcast::<T>()
            .map_err(|actual_type| ResolveError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type,
            })
    }

    /// Resolves every abstract tagged `tag`, each with no extra
    /// arguments, in the container's tag-enumeration order.
    pub fn make_by_tag(&self, tag: &str) -> Result<Vec<Instance>, ResolveError> {
        let names = self.container.borrow().by_tag(tag);
        let mut instances = Vec::with_capacity(names.len());
        for name in names {
            instances.push(self.make(&name, &Args::new())?);
        }
        Ok(instances)
    }

    // ── Lifecycle ──

    /// Declares a host capability [start](App::start) must find present.
    pub fn require_capability(&self, name: impl Into<String>, probe: impl Fn() -> bool + 'static) {
        self.capabilities.borrow_mut().push(Capability {
            name: name.into(),
            probe: Box::new(probe),
        });
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Gates on the required host capabilities, then boots. All absent
    /// capabilities aggregate into one error before any provider runs.
    pub fn start(&self) -> Result<(), StartError> {
        let missing: Vec<String> = self
            .capabilities
            .borrow()
            .iter()
            .filter(|capability| !(capability.probe)())
            .map(|capability| capability.name.clone())
            .collect();
        if !missing.is_empty() {
            tracing::error!("{} required host capabilities are missing", missing.len());
            return Err(MissingCapabilities { missing }.into());
        }

        self.boot()?;
        Ok(())
    }

    /// Runs the two-pass provider lifecycle over the [OPTIONS] lists:
    /// `register` on every built-in then every user provider, then `boot`
    /// on every built-in then every user provider. Each pass completes
    /// across both lists before the next starts, so every boot method
    /// sees every registered binding.
    pub fn boot(&self) -> Result<(), BootError> {
        self.expect_phase(Phase::Unbooted)?;
        let options = self.make_as::<AppOptions>(OPTIONS, &Args::new())?;

        for provider in options.providers.iter().chain(&options.user_providers) {
            tracing::debug!("Registering provider '{}'", provider.name());
            provider
                .register(self)
                .map_err(|error| BootError::ProviderFailed {
                    provider: provider.name(),
                    phase: "register",
                    error,
                })?;
        }
        for provider in options.providers.iter().chain(&options.user_providers) {
            tracing::debug!("Booting provider '{}'", provider.name());
            provider.boot(self).map_err(|error| BootError::ProviderFailed {
                provider: provider.name(),
                phase: "boot",
                error,
            })?;
        }

        self.phase.set(Phase::Booted);
        Ok(())
    }

    /// Tears providers down in list order, built-in before user. No
    /// binding rollback happens.
    pub fn down(&self) -> Result<(), BootError> {
        self.expect_phase(Phase::Booted)?;
        let options = self.make_as::<AppOptions>(OPTIONS, &Args::new())?;

        for provider in options.providers.iter().chain(&options.user_providers) {
            tracing::debug!("Tearing down provider '{}'", provider.name());
            provider.down(self);
        }

        self.phase.set(Phase::TornDown);
        Ok(())
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), BootError> {
        let actual = self.phase.get();
        if actual != expected {
            return Err(BootError::WrongPhase { expected, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_app_starts_unbooted_with_an_empty_container() {
        let app = App::new();
        assert_eq!(app.phase(), Phase::Unbooted);
        assert!(!app.has(OPTIONS));
    }

    #[test]
    fn bound_abstracts_stay_bound() {
        let app = App::new();
        app.instance("config", Instance::new(1_u8), &[]);
        app.bind("svc", Factory::func(|_, _| Ok(Instance::new(2_u8))), &[]);

        assert!(app.has("config"));
        assert!(app.has("svc"));
    }

    #[test]
    fn instance_returns_the_prebuilt_value_every_time() {
        let app = App::new();
        let value = Rc::new(String::from("ready"));
        app.instance("banner", Instance::from_rc(value.clone()), &[]);

        let first = app.make_as::<String>("banner", &Args::new()).unwrap();
        let second = app.make_as::<String>("banner", &Args::new()).unwrap();
        assert!(Rc::ptr_eq(&first, &value));
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn associate_merges_shallowly_with_later_keys_winning() {
        let app = App::new();
        app.associate("svc", Args::new().with("x", 1_i32).with("y", 2_i32));
        app.associate("svc", Args::new().with("x", 9_i32));

        let defaults = app.associations_for("svc");
        assert_eq!(*defaults["x"].downcast::<i32>().unwrap(), 9);
        assert_eq!(*defaults["y"].downcast::<i32>().unwrap(), 2);
    }
}

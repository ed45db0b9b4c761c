use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    rc::Rc,
};

use chassis_di::{app::App, errors::DynError, provider::ServiceProvider, types::Instance};

use crate::errors::RegisterSettingsError;

/// Abstract under which [SettingsProvider] publishes the registry.
pub const SETTINGS: &str = "settings";

/// A registry of settings values, added and retrieved by type.
#[derive(Default)]
pub struct SettingsRegistry {
    values: HashMap<TypeId, Rc<dyn Any>>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a settings value to the registry.
    ///
    /// If a value of the same type is already registered, it returns a
    /// [RegisterSettingsError] instead of overwriting it.
    pub fn add<T: 'static>(&mut self, value: T) -> Result<&mut Self, RegisterSettingsError> {
        let type_id = TypeId::of::<T>();
        if self.values.contains_key(&type_id) {
            return Err(RegisterSettingsError::AlreadyRegistered(type_name::<T>()));
        }

        self.values.insert(type_id, Rc::new(value));
        Ok(self)
    }

    /// Optionally adds a settings value.
    ///
    /// `Some(value)` behaves like [add](SettingsRegistry::add); `None`
    /// just returns `Ok(self)` for chaining.
    pub fn maybe_add<T: 'static>(
        &mut self,
        value: Option<T>,
    ) -> Result<&mut Self, RegisterSettingsError> {
        match value {
            Some(value) => self.add(value),
            None => Ok(self),
        }
    }

    /// Retrieves the settings value of the given type, if registered.
    pub fn get<T: 'static>(&self) -> Option<Rc<T>> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.clone().downcast::<T>().ok())
    }
}

/// Publishes a [SettingsRegistry] through the container during the
/// register phase, so every boot method and autowired constructor can
/// depend on the `"settings"` abstract.
pub struct SettingsProvider {
    registry: Rc<SettingsRegistry>,
}

impl SettingsProvider {
    pub fn new(registry: SettingsRegistry) -> Self {
        SettingsProvider {
            registry: Rc::new(registry),
        }
    }
}

impl ServiceProvider for SettingsProvider {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn register(&self, app: &App) -> Result<(), DynError> {
        tracing::debug!("Publishing the settings registry as '{}'", SETTINGS);
        app.instance(SETTINGS, Instance::from_rc(self.registry.clone()), &[]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    struct Sample {
        enabled: bool,
    }

    #[test]
    fn add_then_get_round_trips() {
        let mut registry = SettingsRegistry::new();
        registry.add(Sample { enabled: true }).unwrap();

        let sample = registry.get::<Sample>().unwrap();
        assert!(sample.enabled);
    }

    #[test]
    fn adding_the_same_type_twice_fails() {
        let mut registry = SettingsRegistry::new();
        registry.add(Sample { enabled: true }).unwrap();

        let err = registry.add(Sample { enabled: false }).err().unwrap();
        assert!(matches!(
            err,
            RegisterSettingsError::AlreadyRegistered(name) if name.contains("Sample")
        ));
    }

    #[test]
    fn maybe_add_skips_none() {
        let mut registry = SettingsRegistry::new();
        registry.maybe_add::<Sample>(None).unwrap();
        assert!(registry.get::<Sample>().is_none());

        registry.maybe_add(Some(Sample { enabled: false })).unwrap();
        assert!(registry.get::<Sample>().is_some());
    }

    #[test]
    fn provider_publishes_the_registry_on_register() {
        let mut registry = SettingsRegistry::new();
        registry.add(Sample { enabled: true }).unwrap();

        let app = App::new();
        let provider = SettingsProvider::new(registry);
        provider.register(&app).unwrap();

        assert!(app.has(SETTINGS));
        let resolved = app
            .make_as::<SettingsRegistry>(SETTINGS, &chassis_di::types::Args::new())
            .unwrap();
        assert!(resolved.get::<Sample>().unwrap().enabled);
    }
}

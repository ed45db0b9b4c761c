use std::{any::type_name, ops::Deref, rc::Rc};

use chassis_di::{app::App, types::Args};

use crate::{
    errors::GetSettingsError,
    provider::{SettingsRegistry, SETTINGS},
};

/// A wrapper type to retrieve one settings value out of a running app.
///
/// # Example
///
/// ```rust
/// use chassis_config::{provider::{SettingsProvider, SettingsRegistry}, settings::Settings};
/// use chassis_di::{app::App, provider::ServiceProvider};
///
/// #[derive(Clone)]
/// struct ViewSettings {
///     side: String,
/// }
///
/// let mut registry = SettingsRegistry::new();
/// registry.add(ViewSettings { side: "right".to_string() }).unwrap();
///
/// let app = App::new();
/// SettingsProvider::new(registry).register(&app).unwrap();
///
/// let view = Settings::<ViewSettings>::resolve(&app).unwrap();
/// assert_eq!(view.side, "right");
/// ```
pub struct Settings<T> {
    inner: Rc<T>,
}

impl<T> Deref for Settings<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> Settings<T> {
    pub fn inner(&self) -> Rc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Rc<T> {
        self.inner
    }
}

impl<T: 'static> Settings<T> {
    /// Resolves the registry out of the `"settings"` abstract and looks
    /// the value up by type.
    pub fn resolve(app: &App) -> Result<Self, GetSettingsError> {
        let registry = app.make_as::<SettingsRegistry>(SETTINGS, &Args::new())?;
        let inner = registry
            .get::<T>()
            .ok_or_else(|| GetSettingsError::Missing(type_name::<T>()))?;

        Ok(Settings { inner })
    }
}

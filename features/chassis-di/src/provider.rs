use std::rc::Rc;

use crate::{app::App, errors::DynError};

/// A unit of application behaviour hooked into the lifecycle.
///
/// Every lifecycle method defaults to a no-op, so a provider only
/// implements the phases it participates in.
pub trait ServiceProvider {
    /// Name used in logs and lifecycle errors.
    fn name(&self) -> &'static str;

    /// Runs for every provider before any provider boots. Bindings
    /// registered here are visible to every boot method.
    fn register(&self, app: &App) -> Result<(), DynError> {
        let _ = app;
        Ok(())
    }

    /// Runs after every provider - built-in and user - has registered.
    fn boot(&self, app: &App) -> Result<(), DynError> {
        let _ = app;
        Ok(())
    }

    /// Runs during teardown. Best effort, cannot fail.
    fn down(&self, app: &App) {
        let _ = app;
    }
}

/// The ordered provider lists [boot](App::boot) reads from the
/// [OPTIONS](crate::app::OPTIONS) abstract.
///
/// Built-in providers always register and boot before user providers, so
/// a user provider may override a built-in binding outright or coexist
/// with it through the `*_if` verbs.
#[derive(Default)]
pub struct AppOptions {
    pub providers: Vec<Rc<dyn ServiceProvider>>,
    pub user_providers: Vec<Rc<dyn ServiceProvider>>,
}

impl AppOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: impl ServiceProvider + 'static) -> Self {
        self.providers.push(Rc::new(provider));
        self
    }

    pub fn with_user_provider(mut self, provider: impl ServiceProvider + 'static) -> Self {
        self.user_providers.push(Rc::new(provider));
        self
    }
}

use thiserror::Error;

use crate::app::Phase;

/// Boxed error at the constructor/provider boundary.
pub type DynError = Box<dyn std::error::Error>;

/// Errors while resolving an abstract through the container.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The abstract has no binding
    #[error("abstract '{0}' is not bound")]
    NotBound(String),
    /// No module with the given name is registered
    #[error("no module named '{0}' is registered")]
    ModuleNotFound(String),
    /// An autowired parameter had no explicit argument, no association
    /// default and no container binding
    #[error("'{requested_by}' needs '{dependency}' but nothing provides it")]
    DependencyNotFound {
        dependency: String,
        requested_by: String,
    },
    #[error("a circular dependency exists between '{from}' and '{to}' through {chain:?}")]
    CircularDependency {
        from: String,
        to: String,
        chain: Vec<String>,
    },
    #[error("failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },
    #[error("constructor of module '{module}' failed: {error}")]
    ConstructorFailed { module: String, error: DynError },
}

/// Errors while driving the provider lifecycle.
#[derive(Error, Debug)]
pub enum BootError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("provider '{provider}' failed during {phase}: {error}")]
    ProviderFailed {
        provider: &'static str,
        phase: &'static str,
        error: DynError,
    },
    #[error("expected the app to be {expected} but it is {actual}")]
    WrongPhase { expected: Phase, actual: Phase },
}

/// Errors raised by [App::start](crate::app::App::start).
#[derive(Error, Debug)]
pub enum StartError {
    #[error(transparent)]
    MissingCapabilities(#[from] MissingCapabilities),
    #[error(transparent)]
    Boot(#[from] BootError),
}

/// Aggregate of every absent host capability, raised before any provider
/// registration runs.
#[derive(Error, Debug, Clone)]
pub struct MissingCapabilities {
    pub missing: Vec<String>,
}

impl std::fmt::Display for MissingCapabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines = Vec::new();
        for name in &self.missing {
            lines.push(format!("missing host capability: {}", name));
        }
        f.write_str(&lines.join("\n"))
    }
}

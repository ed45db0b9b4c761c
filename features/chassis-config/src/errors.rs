use chassis_di::errors::ResolveError;

/// Errors when trying to acquire a settings value
#[derive(thiserror::Error, Debug)]
pub enum GetSettingsError {
    /// No value of the required type was added to the registry
    #[error("the settings type '{0}' is not registered")]
    Missing(&'static str),
    /// The registry itself could not be resolved out of the app
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Errors when trying to register a settings value
#[derive(thiserror::Error, Debug, Clone)]
pub enum RegisterSettingsError {
    /// A value of this type is already registered
    #[error("the settings type '{0}' is already registered")]
    AlreadyRegistered(&'static str),
}

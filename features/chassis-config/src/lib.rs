//! chassis-config provides a registry of typed settings values that can
//! be injected into the rest of the modules through the container.
//!
//! It is split into two major parts:
//! 1. [SettingsRegistry](provider::SettingsRegistry): the registry all
//!    settings are added to, published by
//!    [SettingsProvider](provider::SettingsProvider) under the
//!    `"settings"` abstract during the register phase
//! 2. [Settings<T>](settings::Settings): a wrapper type to resolve and
//!    retrieve one settings value out of a running app
//!
//! # Example
//!
//! ```rust
//! use chassis_config::provider::SettingsRegistry;
//!
//! #[derive(Clone)]
//! struct AppSettings {
//!     host: String,
//!     port: u16,
//! }
//!
//! let mut registry = SettingsRegistry::new();
//! registry
//!     .add(AppSettings {
//!         host: "localhost".to_string(),
//!         port: 8080,
//!     })
//!     .unwrap();
//!
//! let settings = registry.get::<AppSettings>().unwrap();
//! assert_eq!(settings.host, "localhost");
//! assert_eq!(settings.port, 8080);
//! ```

pub mod errors;
pub mod provider;
pub mod settings;

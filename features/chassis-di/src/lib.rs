//! chassis-di is an inversion-of-control runtime: a container mapping
//! abstract names to factories, a resolver that autowires per-module
//! dependency manifests, and an application shell driving a
//! register → boot → down provider lifecycle.
//!
//! It is split into three major parts:
//! 1. Container: pure storage of bindings, their kinds and tags
//! 2. Modules + resolver: autowiring over explicit dependency manifests
//! 3. App: binding verbs, resolution entry points, the lifecycle driver
//!
//! Everything is synchronous and single-threaded: the app lives on the
//! host's one logical thread, factories re-enter resolution freely, and
//! no locking exists anywhere.
//!
//! # Example
//!
//! ```rust
//! use chassis_di::{app::App, modules::Module, types::Args};
//!
//! let app = App::new();
//! app.register_module(Module::value("greeting", String::from("hello")));
//! app.register_module(Module::new("greeter", &["greeting"], |mut deps| {
//!     let greeting = deps.take::<String>()?;
//!     Ok(format!("{greeting}, world"))
//! }));
//! app.bind("greeting", "greeting", &[]);
//!
//! let line = app.make_as::<String>("greeter", &Args::new()).unwrap();
//! assert_eq!(line.as_str(), "hello, world");
//! ```

pub mod app;
pub mod container;
pub mod errors;
pub mod modules;
pub mod provider;
mod resolver;
pub mod types;

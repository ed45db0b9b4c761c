use std::rc::Rc;

use crate::{
    app::App,
    errors::ResolveError,
    modules::{Deps, ModuleKind},
    types::{Args, FactoryFn},
};

/// Builds the autowiring factory stored for a module-backed binding.
///
/// Each manifest parameter resolves with a fixed precedence: an explicit
/// argument of that name, else the abstract's association default, else a
/// recursively resolved container binding of the same name. A parameter
/// none of the three can satisfy aborts the whole resolution.
///
/// The module lookup happens on every invocation, so a module registered
/// after the binding is still found - but an unknown module is a hard
/// error naming it.
pub(crate) fn module_factory(abstract_name: String, module_name: String) -> Rc<FactoryFn> {
    Rc::new(move |app: &App, args: &Args| {
        let module = app
            .module(&module_name)
            .ok_or_else(|| ResolveError::ModuleNotFound(module_name.clone()))?;

        match module.kind() {
            ModuleKind::Value(instance) => Ok(instance.clone()),
            ModuleKind::Constructor { params, build } => {
                let defaults = app.associations_for(&abstract_name);

                let mut resolved = Vec::with_capacity(params.len());
                for param in params.iter() {
                    let value = if let Some(value) = args.get(param) {
                        value.clone()
                    } else if let Some(value) = defaults.get(param) {
                        value.clone()
                    } else if app.has(param) {
                        app.make(param, &Args::new())?
                    } else {
                        return Err(ResolveError::DependencyNotFound {
                            dependency: param.clone(),
                            requested_by: abstract_name.clone(),
                        });
                    };
                    resolved.push(value);
                }

                tracing::debug!(
                    "Constructing module '{}' with {} dependencies",
                    module_name,
                    resolved.len()
                );
                build(Deps::new(resolved)).map_err(|error| ResolveError::ConstructorFailed {
                    module: module_name.clone(),
                    error,
                })
            }
        }
    })
}

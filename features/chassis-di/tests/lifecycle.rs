use std::{cell::RefCell, rc::Rc};

use chassis_di::{
    app::{App, Factory, Phase, OPTIONS},
    errors::{BootError, DynError, ResolveError, StartError},
    provider::{AppOptions, ServiceProvider},
    types::{Args, Instance},
};

/// Provider that records every lifecycle call it receives.
struct Recorder {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
        Recorder {
            name,
            log: log.clone(),
        }
    }

    fn record(&self, phase: &str) {
        self.log.borrow_mut().push(format!("{}.{}", self.name, phase));
    }
}

impl ServiceProvider for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn register(&self, _app: &App) -> Result<(), DynError> {
        self.record("register");
        Ok(())
    }

    fn boot(&self, _app: &App) -> Result<(), DynError> {
        self.record("boot");
        Ok(())
    }

    fn down(&self, _app: &App) {
        self.record("down");
    }
}

fn install_options(app: &App, options: AppOptions) {
    app.instance(OPTIONS, Instance::new(options), &[]);
}

#[test]
fn register_runs_across_both_lists_before_any_boot() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let app = App::new();
    install_options(
        &app,
        AppOptions::new()
            .with_provider(Recorder::new("core", &log))
            .with_provider(Recorder::new("extra", &log))
            .with_user_provider(Recorder::new("user", &log)),
    );

    app.boot().unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            "core.register",
            "extra.register",
            "user.register",
            "core.boot",
            "extra.boot",
            "user.boot",
        ]
    );
    assert_eq!(app.phase(), Phase::Booted);
}

/// Built-in provider registers a binding; user provider's boot reads it.
#[test]
fn user_boot_observes_builtin_registrations() {
    struct Builtin;
    impl ServiceProvider for Builtin {
        fn name(&self) -> &'static str {
            "builtin"
        }
        fn register(&self, app: &App) -> Result<(), DynError> {
            app.instance("svc", Instance::new(41_i32), &[]);
            Ok(())
        }
    }

    struct User {
        seen: Rc<RefCell<Option<i32>>>,
    }
    impl ServiceProvider for User {
        fn name(&self) -> &'static str {
            "user"
        }
        fn boot(&self, app: &App) -> Result<(), DynError> {
            let svc = app.make_as::<i32>("svc", &Args::new())?;
            *self.seen.borrow_mut() = Some(*svc);
            Ok(())
        }
    }

    let seen = Rc::new(RefCell::new(None));
    let app = App::new();
    install_options(
        &app,
        AppOptions::new()
            .with_provider(Builtin)
            .with_user_provider(User { seen: seen.clone() }),
    );

    app.boot().unwrap();
    assert_eq!(*seen.borrow(), Some(41));
}

#[test]
fn user_providers_can_override_builtin_bindings() {
    struct Builtin;
    impl ServiceProvider for Builtin {
        fn name(&self) -> &'static str {
            "builtin"
        }
        fn register(&self, app: &App) -> Result<(), DynError> {
            app.bind("svc", Factory::func(|_, _| Ok(Instance::new(1_i32))), &[]);
            app.bind_if("kept", Factory::func(|_, _| Ok(Instance::new(10_i32))), &[]);
            Ok(())
        }
    }

    struct User;
    impl ServiceProvider for User {
        fn name(&self) -> &'static str {
            "user"
        }
        fn register(&self, app: &App) -> Result<(), DynError> {
            app.bind("svc", Factory::func(|_, _| Ok(Instance::new(2_i32))), &[]);
            app.bind_if("kept", Factory::func(|_, _| Ok(Instance::new(20_i32))), &[]);
            Ok(())
        }
    }

    let app = App::new();
    install_options(&app, AppOptions::new().with_provider(Builtin).with_user_provider(User));
    app.boot().unwrap();

    assert_eq!(*app.make_as::<i32>("svc", &Args::new()).unwrap(), 2);
    assert_eq!(*app.make_as::<i32>("kept", &Args::new()).unwrap(), 10);
}

#[test]
fn down_runs_builtin_then_user_in_list_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let app = App::new();
    install_options(
        &app,
        AppOptions::new()
            .with_provider(Recorder::new("core", &log))
            .with_user_provider(Recorder::new("user", &log)),
    );

    app.boot().unwrap();
    log.borrow_mut().clear();

    app.down().unwrap();
    assert_eq!(*log.borrow(), vec!["core.down", "user.down"]);
    assert_eq!(app.phase(), Phase::TornDown);
}

/// A provider without its own `down` is silently skipped at that phase.
#[test]
fn default_lifecycle_methods_are_noops() {
    struct Bare;
    impl ServiceProvider for Bare {
        fn name(&self) -> &'static str {
            "bare"
        }
    }

    let app = App::new();
    install_options(&app, AppOptions::new().with_provider(Bare));

    app.boot().unwrap();
    app.down().unwrap();
    assert_eq!(app.phase(), Phase::TornDown);
}

#[test]
fn lifecycle_is_a_single_forward_path() {
    let app = App::new();
    install_options(&app, AppOptions::new());

    let err = app.down().unwrap_err();
    assert!(matches!(
        err,
        BootError::WrongPhase {
            expected: Phase::Booted,
            actual: Phase::Unbooted,
        }
    ));

    app.boot().unwrap();
    let err = app.boot().unwrap_err();
    assert!(matches!(
        err,
        BootError::WrongPhase {
            expected: Phase::Unbooted,
            actual: Phase::Booted,
        }
    ));
}

#[test]
fn boot_without_options_fails() {
    let app = App::new();
    let err = app.boot().unwrap_err();
    assert!(matches!(
        err,
        BootError::Resolve(ResolveError::ModuleNotFound(name)) if name == OPTIONS
    ));
}

#[test]
fn start_aggregates_all_missing_capabilities_before_any_provider_runs() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let app = App::new();
    install_options(&app, AppOptions::new().with_provider(Recorder::new("core", &log)));

    app.require_capability("float-windows", || false);
    app.require_capability("virtual-text", || true);
    app.require_capability("extmarks", || false);

    let err = app.start().unwrap_err();
    match err {
        StartError::MissingCapabilities(missing) => {
            assert_eq!(
                missing.to_string(),
                "missing host capability: float-windows\nmissing host capability: extmarks"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(log.borrow().is_empty());
    assert_eq!(app.phase(), Phase::Unbooted);
}

#[test]
fn start_boots_when_every_capability_is_present() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let app = App::new();
    install_options(&app, AppOptions::new().with_provider(Recorder::new("core", &log)));

    app.require_capability("virtual-text", || true);
    app.start().unwrap();
    assert_eq!(app.phase(), Phase::Booted);
    assert_eq!(*log.borrow(), vec!["core.register", "core.boot"]);
}

#[test]
fn failing_provider_aborts_boot_with_its_name_and_phase() {
    struct Flaky;
    impl ServiceProvider for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }
        fn boot(&self, _app: &App) -> Result<(), DynError> {
            Err("no backend".into())
        }
    }

    let app = App::new();
    install_options(&app, AppOptions::new().with_provider(Flaky));

    let err = app.boot().unwrap_err();
    match err {
        BootError::ProviderFailed {
            provider,
            phase,
            error,
        } => {
            assert_eq!(provider, "flaky");
            assert_eq!(phase, "boot");
            assert_eq!(error.to_string(), "no backend");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(app.phase(), Phase::Unbooted);
}

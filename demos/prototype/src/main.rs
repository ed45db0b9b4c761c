use std::rc::Rc;

use chassis_config::provider::{SettingsProvider, SettingsRegistry};
use chassis_di::{
    app::{App, OPTIONS},
    errors::DynError,
    provider::{AppOptions, ServiceProvider},
    types::{Args, Instance},
};

use modules::{
    greeter::{Greeter, GreeterSettings},
    journal::Journal,
};

mod modules;

/// Built-in provider wiring the demo's core bindings.
struct CoreProvider;

impl ServiceProvider for CoreProvider {
    fn name(&self) -> &'static str {
        "core"
    }

    fn register(&self, app: &App) -> Result<(), DynError> {
        app.singleton("journal", "journal", &[]);
        app.bind("greeter", "greeter", &[]);
        Ok(())
    }
}

/// User provider: notes the boot in the journal and dumps it on the way
/// down.
struct BannerProvider;

impl ServiceProvider for BannerProvider {
    fn name(&self) -> &'static str {
        "banner"
    }

    fn boot(&self, app: &App) -> Result<(), DynError> {
        let journal: Rc<Journal> = app.make_as("journal", &Args::new())?;
        journal.note("application booted");
        Ok(())
    }

    fn down(&self, app: &App) {
        if let Ok(journal) = app.make_as::<Journal>("journal", &Args::new()) {
            for line in journal.entries() {
                println!("journal: {}", line);
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt().init();

    let app = App::new();
    app.register_module(modules::journal::module());
    app.register_module(modules::greeter::module());

    let mut settings = SettingsRegistry::new();
    settings
        .add(GreeterSettings {
            greeting: "hello".to_string(),
        })
        .expect("first registration of GreeterSettings");

    let options = AppOptions::new()
        .with_provider(SettingsProvider::new(settings))
        .with_provider(CoreProvider)
        .with_user_provider(BannerProvider);
    app.instance(OPTIONS, Instance::new(options), &[]);

    app.require_capability("ansi-terminal", || true);

    if let Err(e) = app.start() {
        eprintln!("Application failed to start: {}", e);
        return;
    }

    match app.make_as::<Greeter>("greeter", &Args::new()) {
        Ok(greeter) => println!("{}", greeter.greet("world")),
        Err(e) => eprintln!("Failed to resolve the greeter: {}", e),
    }

    if let Err(e) = app.down() {
        eprintln!("Application failed to tear down: {}", e);
    }
}

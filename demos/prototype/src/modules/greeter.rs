use std::rc::Rc;

use chassis_config::provider::SettingsRegistry;
use chassis_di::modules::Module;

use super::journal::Journal;

#[derive(Clone)]
pub struct GreeterSettings {
    pub greeting: String,
}

/// Greets and notes every greeting in the journal.
pub struct Greeter {
    journal: Rc<Journal>,
    greeting: String,
}

impl Greeter {
    pub fn greet(&self, who: &str) -> String {
        let line = format!("{} {}", self.greeting, who);
        self.journal.note(&line);
        line
    }
}

pub fn module() -> Module {
    Module::new("greeter", &["journal", "settings"], |mut deps| {
        let journal = deps.take::<Journal>()?;
        let settings = deps.take::<SettingsRegistry>()?;

        let greeting = settings
            .get::<GreeterSettings>()
            .map(|settings| settings.greeting.clone())
            .unwrap_or_else(|| "hello".to_string());

        Ok(Greeter { journal, greeting })
    })
}

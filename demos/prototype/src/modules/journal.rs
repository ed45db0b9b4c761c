use std::cell::RefCell;

use chassis_di::modules::Module;

/// Ordered log of application events, shared app-wide as a singleton.
pub struct Journal {
    entries: RefCell<Vec<String>>,
}

impl Journal {
    pub fn new() -> Self {
        Journal {
            entries: RefCell::new(Vec::new()),
        }
    }

    pub fn note(&self, line: &str) {
        self.entries.borrow_mut().push(line.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

pub fn module() -> Module {
    Module::new("journal", &[], |_| Ok(Journal::new()))
}

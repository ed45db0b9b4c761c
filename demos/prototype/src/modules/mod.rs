pub mod greeter;
pub mod journal;

//! Terminal front end: renders the wizard and maps commands onto the
//! controller operations.

pub mod core;
pub mod output;
pub mod prompts;
pub mod render;
mod shell;

pub use shell::run_cli;

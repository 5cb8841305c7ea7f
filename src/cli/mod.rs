//! CLI module - argument parsing, model list loading and interactive prompts

pub mod args;
pub mod config;
pub mod prompts;

pub use args::Cli;
pub use config::*;
pub use prompts::*;

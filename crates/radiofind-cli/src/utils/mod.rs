//! Shared CLI helpers: argument types, logging setup and configuration loading.

pub mod cli_args;
pub mod logging;
pub mod settings;

pub use logging::initialize_logging;

pub mod cli;
pub mod commands;
pub mod config;
pub mod execution;
pub mod logging;
pub mod plugins;
pub mod polyfill;
pub mod report;
pub mod state;
pub mod time;
pub mod utils;

pub use plugins::{JsonReporter, PluginRegistry, ReporterPlugin};
pub use report::{HostError, OutStream, ReporterPluginHost};
pub use state::Report;

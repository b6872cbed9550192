//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, and the main
//! application runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod profiles_cmd;

// Re-export commonly used types
pub use app::{run_devices, run_record, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, ProfilesAction, RecordOptions};
pub use presenter::Presenter;

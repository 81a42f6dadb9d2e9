mod app;
pub mod config;
pub mod history;
pub mod input;
pub mod menu;
pub mod session;
mod telemetry;
pub mod terminal_restore;

pub use app::logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
pub use telemetry::{init_tracing, session_span};

//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::menu::MenuRegistry;
pub use defaults::{DEFAULT_CTL_CMD, DEFAULT_HISTORY_SIZE, MAX_HISTORY_SIZE};

/// CLI options for btshell. Validated values keep the spawned controller predictable.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "btshell",
    about = "btshell - run bluetoothctl commands from any menu",
    author,
    version
)]
pub struct AppConfig {
    /// Controller command line (binary plus optional arguments)
    #[arg(long = "ctl-cmd", env = "BTSHELL_CTL_CMD", default_value = DEFAULT_CTL_CMD)]
    pub ctl_cmd: String,

    /// Number of submitted lines kept for Up/Down recall
    #[arg(long = "history-size", default_value_t = DEFAULT_HISTORY_SIZE)]
    pub history_size: usize,

    /// Menu registry file (.json, .yaml or .yml) replacing the built-in bluetoothctl menus
    #[arg(long = "menus", env = "BTSHELL_MENUS", value_name = "PATH")]
    pub menus: Option<PathBuf>,

    /// Print the command reference for every menu and exit
    #[arg(long = "list-menus", default_value_t = false)]
    pub list_menus: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "BTSHELL_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "BTSHELL_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow typed command lines in the debug log
    #[arg(
        long = "log-content",
        env = "BTSHELL_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,

    /// Arguments passed to the controller untouched (after `--`)
    #[arg(last = true, value_name = "CTL_ARGS")]
    pub ctl_args: Vec<String>,
}

/// Resolved controller program and its full argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl AppConfig {
    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }

    /// Split `--ctl-cmd` and append the passthrough arguments.
    pub fn controller_command(&self) -> Result<ControllerCommand> {
        let (program, mut args) = validation::split_command(&self.ctl_cmd)?;
        args.extend(self.ctl_args.iter().cloned());
        Ok(ControllerCommand { program, args })
    }

    /// The registry from `--menus`, or the built-in bluetoothctl menus.
    pub fn menu_registry(&self) -> Result<MenuRegistry> {
        match &self.menus {
            Some(path) => MenuRegistry::from_path(path),
            None => Ok(MenuRegistry::bluetoothctl()?),
        }
    }
}

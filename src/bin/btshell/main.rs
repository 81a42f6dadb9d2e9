//! btshell entrypoint: runs the controller as a child process and routes every
//! typed command to the menu that owns it.
//!
//! # Architecture
//!
//! - Input thread: reads raw stdin chunks
//! - Waiter thread: reports when the controller exits
//! - Main thread: interprets keys, echoes to stderr, writes to the controller

use anyhow::{Context, Result};
use btshell::config::AppConfig;
use btshell::history::HistoryCache;
use btshell::input::InputInterpreter;
use btshell::menu::{render_help, MenuRouter};
use btshell::session::{
    finish, run_session, spawn_input_thread, ControllerProcess, INPUT_CHANNEL_CAPACITY,
};
use btshell::terminal_restore::TerminalRestoreGuard;
use btshell::{init_logging, init_tracing, log_debug, log_file_path, session_span};
use crossbeam_channel::bounded;
use std::io::{self, Write};

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;

    if config.list_menus {
        let registry = config.menu_registry()?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(render_help(&registry).replace("\r\n", "\n").as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    init_logging(&config);
    init_tracing(&config);
    log_debug("=== btshell started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));

    let registry = config.menu_registry()?;
    let history = HistoryCache::new(config.history_size).context("invalid --history-size")?;
    let mut interpreter = InputInterpreter::new(MenuRouter::new(registry), history);

    let command = config.controller_command()?;
    let controller = ControllerProcess::spawn(&command.program, &command.args)?;
    let session = session_span(&command.program, controller.pid());
    let _session = session.enter();
    tracing::info!(args = command.args.len(), "controller spawned");
    let (mut sink, exit_rx) = controller.into_parts();

    let terminal_guard = TerminalRestoreGuard::new();
    let raw = terminal_guard
        .enable_raw_mode()
        .context("failed to enable raw mode")?;
    log_debug(&format!("raw mode: {raw}"));

    let (input_tx, input_rx) = bounded(INPUT_CHANNEL_CAPACITY);
    let _input_handle = spawn_input_thread(io::stdin(), input_tx);

    let mut display = io::stderr();
    let outcome = run_session(
        &mut interpreter,
        &input_rx,
        &exit_rx,
        &mut display,
        &mut sink,
    );
    terminal_guard.restore();

    let end = match outcome {
        Ok(end) => end,
        Err(err) => {
            log_debug(&format!("session failed: {err:#}"));
            return Err(err);
        }
    };
    finish(sink, &exit_rx, end)?;

    log_debug("=== btshell exiting ===");
    Ok(())
}

//! Session driver: feeds keyboard chunks through the interpreter, writes the
//! resulting bytes to the terminal and the controller, and waits for the
//! controller once the session is over.
//!
//! # Threads
//!
//! - Input thread: reads raw stdin and sends chunks over a bounded channel
//! - Waiter thread: owns the controller process and reports its exit once
//! - Caller thread: runs the interpreter and performs every write, so the
//!   controller sees navigation lines strictly before the line they serve

mod controller;
mod io;

#[cfg(test)]
mod tests;

pub use controller::{ControllerProcess, ExitSignal};
pub use io::spawn_input_thread;

use crate::input::{Action, EndReason, InputInterpreter};
use crate::log_debug;
use crate::menu::render_help;
use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{select, Receiver};
use std::io::Write;

/// Max pending input chunks before the reader blocks.
pub const INPUT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
    /// The raw input stream closed.
    InputClosed,
    /// The controller exited on its own while the session was running.
    ControllerExited,
}

impl From<EndReason> for SessionEnd {
    fn from(reason: EndReason) -> Self {
        match reason {
            EndReason::Quit => SessionEnd::Quit,
            EndReason::EndOfInput => SessionEnd::EndOfInput,
        }
    }
}

/// Run until the user ends the session, input closes, or the controller exits.
///
/// Protocol faults and write failures end the session with an error.
pub fn run_session<D, S>(
    interpreter: &mut InputInterpreter,
    input_rx: &Receiver<Vec<u8>>,
    exit_rx: &ExitSignal,
    display: &mut D,
    sink: &mut S,
) -> Result<SessionEnd>
where
    D: Write,
    S: Write,
{
    let mut actions = Vec::new();
    loop {
        select! {
            recv(input_rx) -> chunk => {
                let Ok(chunk) = chunk else {
                    return Ok(ended(SessionEnd::InputClosed));
                };
                actions.clear();
                interpreter
                    .feed(&chunk, &mut actions)
                    .context("aborting session")?;
                for action in actions.drain(..) {
                    if let Some(end) = apply_action(action, interpreter, display, sink)? {
                        return Ok(ended(end));
                    }
                }
                display.flush().context("write to display failed")?;
            }
            recv(exit_rx) -> status => {
                return match status {
                    Ok(Ok(())) => Ok(ended(SessionEnd::ControllerExited)),
                    Ok(Err(err)) => Err(err),
                    Err(_) => Err(anyhow!("controller waiter disconnected unexpectedly")),
                };
            }
        }
    }
}

fn apply_action<D: Write, S: Write>(
    action: Action,
    interpreter: &InputInterpreter,
    display: &mut D,
    sink: &mut S,
) -> Result<Option<SessionEnd>> {
    match action {
        Action::Display(bytes) => {
            display
                .write_all(&bytes)
                .context("write to display failed")?;
        }
        Action::Forward(bytes) => {
            sink.write_all(&bytes)
                .and_then(|()| sink.flush())
                .context("write to controller failed")?;
        }
        Action::Help => {
            let help = render_help(interpreter.router().registry());
            display
                .write_all(help.as_bytes())
                .context("write to display failed")?;
        }
        Action::End(reason) => return Ok(Some(reason.into())),
    }
    Ok(None)
}

fn ended(end: SessionEnd) -> SessionEnd {
    log_debug(&format!("session ended: {end:?}"));
    tracing::info!(end = ?end, "session ended");
    end
}

/// Close the controller's input and wait for it to exit. No timeout: a
/// controller that ignores end of input keeps the session open.
pub fn finish<S: Write>(sink: S, exit_rx: &ExitSignal, end: SessionEnd) -> Result<()> {
    drop(sink);
    if end == SessionEnd::ControllerExited {
        return Ok(());
    }
    match exit_rx.recv() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("controller waiter disconnected unexpectedly")),
    }
}

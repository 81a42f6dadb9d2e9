use crate::log_debug;
use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{bounded, Receiver};
use std::process::{ChildStdin, Command, Stdio};
use std::thread;

/// One-shot completion signal of the controller process.
pub type ExitSignal = Receiver<Result<()>>;

/// The menu-driven subprocess. Its stdout and stderr go straight to the
/// user's terminal; only its stdin passes through the interpreter.
pub struct ControllerProcess {
    stdin: ChildStdin,
    exit_rx: ExitSignal,
    pid: u32,
}

impl ControllerProcess {
    /// Start `command` and hand its lifetime to a waiter thread.
    pub fn spawn(command: &str, args: &[String]) -> Result<Self> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to spawn {command}"))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("{command} stdin was not captured"))?;
        let pid = child.id();
        log_debug(&format!("spawned {command} (pid {pid})"));

        let (tx, exit_rx) = bounded(1);
        let label = command.to_string();
        thread::spawn(move || {
            let result = match child.wait() {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => Err(anyhow!("{label} exited with {status}")),
                Err(err) => Err(anyhow!("failed to wait for {label}: {err}")),
            };
            log_debug(&format!("{label} (pid {pid}) finished: {result:?}"));
            let _ = tx.send(result);
        });

        Ok(Self {
            stdin,
            exit_rx,
            pid,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn into_parts(self) -> (ChildStdin, ExitSignal) {
        (self.stdin, self.exit_rx)
    }
}

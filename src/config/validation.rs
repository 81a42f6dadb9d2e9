use super::defaults::{KNOWN_CONTROLLERS, MAX_HISTORY_SIZE};
use super::AppConfig;
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::{fs, path::Path};

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize paths.
    pub fn validate(&mut self) -> Result<()> {
        if !(1..=MAX_HISTORY_SIZE).contains(&self.history_size) {
            bail!(
                "--history-size must be between 1 and {MAX_HISTORY_SIZE}, got {}",
                self.history_size
            );
        }

        let (program, extra_args) = split_command(&self.ctl_cmd)?;
        let program = resolve_controller(&program)?;
        self.ctl_cmd = shell_words::join(std::iter::once(program).chain(extra_args));

        if let Some(path) = &self.menus {
            let canonical = path
                .canonicalize()
                .with_context(|| format!("failed to canonicalize --menus '{}'", path.display()))?;
            if !canonical.is_file() {
                bail!("--menus '{}' is not a file", canonical.display());
            }
            self.menus = Some(canonical);
        }

        Ok(())
    }
}

/// Split a command string into program and arguments, honouring shell quoting.
pub(super) fn split_command(raw: &str) -> Result<(String, Vec<String>)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("--ctl-cmd cannot be empty");
    }
    let mut parts = shell_words::split(trimmed)
        .with_context(|| format!("--ctl-cmd '{trimmed}' has unbalanced quotes"))?
        .into_iter();
    let program = parts
        .next()
        .ok_or_else(|| anyhow!("--ctl-cmd cannot be empty"))?;
    Ok((program, parts.collect()))
}

/// Resolve the controller program: a known controller name, or a path to an
/// executable file (returned canonicalized).
pub(super) fn resolve_controller(program: &str) -> Result<String> {
    let program = program.trim();
    if let Some(known) = KNOWN_CONTROLLERS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(program))
    {
        return Ok((*known).to_string());
    }

    let path = Path::new(program);
    if !path.is_absolute() && path.components().count() < 2 {
        bail!(
            "--ctl-cmd '{program}' is not a known controller ({}); give a path to run another binary",
            KNOWN_CONTROLLERS.join(", ")
        );
    }
    let resolved = path
        .canonicalize()
        .with_context(|| format!("--ctl-cmd '{program}' does not exist"))?;
    ensure_executable(&resolved)?;
    resolved
        .into_os_string()
        .into_string()
        .map_err(|raw| anyhow!("--ctl-cmd path {raw:?} is not valid UTF-8"))
}

fn ensure_executable(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to inspect --ctl-cmd '{}'", path.display()))?;
    if !metadata.is_file() {
        bail!("--ctl-cmd '{}' is not a file", path.display());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = metadata.permissions().mode();
        if mode & 0o111 == 0 {
            bail!(
                "--ctl-cmd '{}' is not executable (mode {mode:o})",
                path.display()
            );
        }
    }
    Ok(())
}

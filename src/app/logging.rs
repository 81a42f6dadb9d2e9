use crate::config::AppConfig;
use std::{
    env, fs,
    io::Write,
    panic,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
    time::{SystemTime, UNIX_EPOCH},
};

const LOG_MAX_BYTES: u64 = 2 * 1024 * 1024;
const CRASH_LOG_MAX_BYTES: u64 = 256 * 1024;
static LOG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_CONTENT_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_WRITER: OnceLock<Mutex<Option<LogWriter>>> = OnceLock::new();

/// Debug log location; rotated in place once it grows past its cap.
pub fn log_file_path() -> PathBuf {
    env::temp_dir().join("btshell.log")
}

/// Crash log location (panic location, payload only with `--log-content`).
pub fn crash_log_path() -> PathBuf {
    env::temp_dir().join("btshell_crash.log")
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Append-only file that truncates itself instead of exceeding `max_bytes`.
struct LogWriter {
    path: PathBuf,
    file: fs::File,
    max_bytes: u64,
    bytes_written: u64,
}

impl LogWriter {
    fn open(path: &Path, max_bytes: u64) -> Option<Self> {
        let existing = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let truncate = existing > max_bytes;
        let file = fs::OpenOptions::new()
            .create(true)
            .append(!truncate)
            .write(true)
            .truncate(truncate)
            .open(path)
            .ok()?;
        Some(Self {
            path: path.to_path_buf(),
            file,
            max_bytes,
            bytes_written: if truncate { 0 } else { existing },
        })
    }

    fn write_line(&mut self, line: &str) {
        if self.bytes_written.saturating_add(line.len() as u64) > self.max_bytes {
            if let Some(fresh) = Self::open_truncated(&self.path) {
                self.file = fresh;
                self.bytes_written = 0;
            }
        }
        if self.file.write_all(line.as_bytes()).is_ok() {
            self.bytes_written = self.bytes_written.saturating_add(line.len() as u64);
        }
    }

    fn open_truncated(path: &Path) -> Option<fs::File> {
        fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .ok()
    }
}

fn log_writer() -> &'static Mutex<Option<LogWriter>> {
    LOG_WRITER.get_or_init(|| Mutex::new(None))
}

fn set_logging(enabled: bool, content_enabled: bool, path: &Path) {
    LOG_ENABLED.store(enabled, Ordering::Relaxed);
    LOG_CONTENT_ENABLED.store(enabled && content_enabled, Ordering::Relaxed);
    let mut writer = log_writer()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *writer = if enabled {
        LogWriter::open(path, LOG_MAX_BYTES)
    } else {
        None
    };
}

/// Configure file logging from the CLI flags. `--no-logs` wins over everything.
pub fn init_logging(config: &AppConfig) {
    set_logging(config.logging_enabled(), config.log_content, &log_file_path());
}

pub fn log_debug(msg: &str) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let line = format!("[{}] {msg}\n", unix_seconds());
    let mut writer = log_writer()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(writer) = writer.as_mut() {
        writer.write_line(&line);
    }
}

/// Log a message carrying typed command lines; dropped unless `--log-content`.
pub fn log_debug_content(msg: &str) {
    if LOG_CONTENT_ENABLED.load(Ordering::Relaxed) {
        log_debug(msg);
    }
}

/// Record a panic in the crash log. The payload can echo user input, so it is
/// only written when content logging is on.
pub fn log_panic(info: &panic::PanicHookInfo<'_>) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown".to_string());
    let payload = if LOG_CONTENT_ENABLED.load(Ordering::Relaxed) {
        info.payload()
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string())
    } else {
        "panic payload omitted (log-content disabled)".to_string()
    };
    let line = format!(
        "[{}] panic at {location}: {payload} (v{})\n",
        unix_seconds(),
        env!("CARGO_PKG_VERSION")
    );
    if let Some(mut writer) = LogWriter::open(&crash_log_path(), CRASH_LOG_MAX_BYTES) {
        writer.write_line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_truncates_instead_of_growing_past_cap() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("btshell-test.log");
        let mut writer = LogWriter::open(&path, 16).expect("open log");
        writer.write_line("0123456789\n");
        writer.write_line("abcdefghij\n");
        drop(writer);
        let contents = fs::read_to_string(&path).expect("read log");
        assert_eq!(contents, "abcdefghij\n");
    }

    #[test]
    fn oversized_log_is_reset_on_open() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("btshell-test.log");
        fs::write(&path, "x".repeat(64)).expect("seed log");
        let mut writer = LogWriter::open(&path, 32).expect("open log");
        writer.write_line("fresh\n");
        drop(writer);
        assert_eq!(fs::read_to_string(&path).expect("read log"), "fresh\n");
    }

    #[test]
    fn existing_log_is_appended() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("btshell-test.log");
        fs::write(&path, "old\n").expect("seed log");
        let mut writer = LogWriter::open(&path, 1024).expect("open log");
        writer.write_line("new\n");
        drop(writer);
        assert_eq!(fs::read_to_string(&path).expect("read log"), "old\nnew\n");
    }
}

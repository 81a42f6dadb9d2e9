pub const DEFAULT_CTL_CMD: &str = "bluetoothctl";
pub const DEFAULT_HISTORY_SIZE: usize = 100;
pub const MAX_HISTORY_SIZE: usize = 10_000;

/// Controllers accepted by bare name; anything else needs a path.
pub(super) const KNOWN_CONTROLLERS: &[&str] = &["bluetoothctl"];

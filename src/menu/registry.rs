use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_ROOT_MENU: &str = "main";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("root menu '{0}' is not declared")]
    MissingRoot(String),
    #[error("menu names cannot be empty")]
    EmptyMenuName,
    #[error("menu '{0}' is declared more than once")]
    DuplicateMenu(String),
    #[error("menu '{0}' declares an empty command name")]
    EmptyCommandName(String),
    #[error("command '{command}' is owned by both '{first}' and '{second}'")]
    DuplicateCommand {
        command: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default)]
    pub params: String,
    #[serde(default)]
    pub description: String,
}

impl Command {
    pub fn new(name: &str, params: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            params: params.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub name: String,
    pub commands: Vec<Command>,
}

/// On-disk registry layout shared by the JSON and YAML loaders.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default = "default_root")]
    root: String,
    menus: Vec<Menu>,
}

fn default_root() -> String {
    DEFAULT_ROOT_MENU.to_string()
}

/// Immutable map of menus to the commands they own.
///
/// Menu order is preserved for help output; ownership lookups go through an
/// index built once at construction.
#[derive(Debug, Clone)]
pub struct MenuRegistry {
    root: String,
    menus: Vec<Menu>,
    owners: HashMap<String, usize>,
}

impl MenuRegistry {
    pub fn new(root: &str, menus: Vec<Menu>) -> Result<Self, RegistryError> {
        let mut seen_menus = HashSet::new();
        let mut owners: HashMap<String, usize> = HashMap::new();
        for (idx, menu) in menus.iter().enumerate() {
            if menu.name.trim().is_empty() {
                return Err(RegistryError::EmptyMenuName);
            }
            if !seen_menus.insert(menu.name.as_str()) {
                return Err(RegistryError::DuplicateMenu(menu.name.clone()));
            }
            for command in &menu.commands {
                if command.name.trim().is_empty() {
                    return Err(RegistryError::EmptyCommandName(menu.name.clone()));
                }
                if let Some(&first) = owners.get(&command.name) {
                    return Err(RegistryError::DuplicateCommand {
                        command: command.name.clone(),
                        first: menus[first].name.clone(),
                        second: menu.name.clone(),
                    });
                }
                owners.insert(command.name.clone(), idx);
            }
        }
        if !seen_menus.contains(root) {
            return Err(RegistryError::MissingRoot(root.to_string()));
        }
        Ok(Self {
            root: root.to_string(),
            menus,
            owners,
        })
    }

    /// Load a registry from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read menu registry '{}'", path.display()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let file: RegistryFile = match extension.as_deref() {
            Some("json") => serde_json::from_str(&raw)
                .with_context(|| format!("invalid JSON in '{}'", path.display()))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
                .with_context(|| format!("invalid YAML in '{}'", path.display()))?,
            _ => bail!(
                "menu registry '{}' must have a .json, .yaml or .yml extension",
                path.display()
            ),
        };
        Self::new(&file.root, file.menus)
            .with_context(|| format!("invalid menu registry '{}'", path.display()))
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    /// Name of the menu owning `command`, if any.
    pub fn owner(&self, command: &str) -> Option<&str> {
        self.owners
            .get(command)
            .map(|&idx| self.menus[idx].name.as_str())
    }

    /// The command tables of `bluetoothctl`.
    pub fn bluetoothctl() -> Result<Self, RegistryError> {
        let menus = vec![
            menu(
                DEFAULT_ROOT_MENU,
                &[
                    ("list", "", "List available controllers"),
                    ("show", "[ctrl]", "Controller information"),
                    ("select", "<ctrl>", "Select default controller"),
                    ("devices", "", "List available devices"),
                    ("paired-devices", "", "List paired devices"),
                    ("system-alias", "<name>", "Set controller alias"),
                    ("reset-alias", "", "Reset controller alias"),
                    ("power", "<on/off>", "Set controller power"),
                    ("pairable", "<on/off>", "Set controller pairable mode"),
                    ("discoverable", "<on/off>", "Set controller discoverable mode"),
                    (
                        "agent",
                        "<on/off/capability>",
                        "Enable/disable agent with given capability",
                    ),
                    ("default-agent", "", "Set agent as the default one"),
                    (
                        "advertise",
                        "<on/off/type>",
                        "Enable/disable advertising with given type",
                    ),
                    ("set-alias", "<alias>", "Set device alias"),
                    ("scan", "<on/off>", "Scan for devices"),
                    ("info", "[dev]", "Device information"),
                    ("pair", "[dev]", "Pair with device"),
                    ("trust", "[dev]", "Trust device"),
                    ("untrust", "[dev]", "Untrust device"),
                    ("block", "[dev]", "Block device"),
                    ("unblock", "[dev]", "Unblock device"),
                    ("remove", "<dev>", "Remove device"),
                    ("connect", "<dev>", "Connect device"),
                    ("disconnect", "[dev]", "Disconnect device"),
                ],
            ),
            menu(
                "advertise",
                &[
                    ("set-uuids", "[uuid1 uuid2 ...]", "Set advertise uuids"),
                    (
                        "set-service",
                        "[uuid] [data=xx xx ...]",
                        "Set advertise service data",
                    ),
                    ("set-manufacturer", "[id]", "Set advertise manufacturer data"),
                    (
                        "set-tx-power",
                        "<on/off>",
                        "Enable/disable TX power to be advertised",
                    ),
                    (
                        "set-name",
                        "<on/off/name>",
                        "Enable/disable local name to be advertised",
                    ),
                    (
                        "set-appearance",
                        "<value>",
                        "Set custom appearance to be advertised",
                    ),
                    ("set-duration", "<seconds>", "Set advertise duration"),
                    ("set-timeout", "<seconds>", "Set advertise timeout"),
                ],
            ),
            menu(
                "scan",
                &[
                    ("uuids", "[all/uuid1 uuid2 ...]", "Set/Get UUIDs filter"),
                    ("rssi", "[rssi]", "Set/Get RSSI filter, and clears pathloss"),
                    (
                        "pathloss",
                        "[pathloss]",
                        "Set/Get Pathloss filter, and clears RSSI",
                    ),
                    ("transport", "[transport]", "Set/Get transport filter"),
                    ("duplicate-data", "[on/off]", "Set/Get duplicate data filter"),
                    (
                        "clear",
                        "[uuids/rssi/pathloss/transport/duplicate-data]",
                        "Clears discovery filter",
                    ),
                ],
            ),
            menu(
                "gatt",
                &[
                    ("list-attributes", "[dev]", "List attributes"),
                    ("select-attribute", "<attribute/UUID>", "Select attribute"),
                    ("attribute-info", "[attribute/UUID]", "Attribute info"),
                    ("read", "", "Read attribute value"),
                    ("write", "<data=xx xx ...>", "Write attribute value"),
                    ("acquire-write", "", "Acquire Write file descriptor"),
                    ("release-write", "", "Release Write file descriptor"),
                    ("acquire-notify", "", "Acquire Notify file descriptor"),
                    ("release-notify", "", "Release Notify file descriptor"),
                    ("notify", "<on/off>", "Notify attribute value"),
                    ("register-application", "[UUID ...]", "Register profile to connect"),
                    ("unregister-application", "", "Unregister profile"),
                    ("register-service", "<UUID>", "Register application service"),
                    (
                        "unregister-service",
                        "<UUID/object>",
                        "Unregister application service",
                    ),
                    (
                        "register-characteristic",
                        "<UUID> <Flags=read,write,notify...>",
                        "Register application characteristic",
                    ),
                    (
                        "unregister-characteristic",
                        "<UUID/object>",
                        "Unregister application characteristic",
                    ),
                    (
                        "register-descriptor",
                        "<UUID> <Flags=read,write...>",
                        "Register application descriptor",
                    ),
                    (
                        "unregister-descriptor",
                        "<UUID/object>",
                        "Unregister application descriptor",
                    ),
                ],
            ),
        ];
        Self::new(DEFAULT_ROOT_MENU, menus)
    }
}

fn menu(name: &str, commands: &[(&str, &str, &str)]) -> Menu {
    Menu {
        name: name.to_string(),
        commands: commands
            .iter()
            .map(|(name, params, description)| Command::new(name, params, description))
            .collect(),
    }
}

//! Static command reference printed for the `help` pseudo-command.

use super::registry::{Command, MenuRegistry};

const SEPARATOR: &str = "---------------";

/// Commands accepted in every menu.
const COMMON_COMMANDS: &[(&str, &str, &str)] = &[
    ("version", "", "Print version"),
    ("exit", "", "Exit"),
    ("quit", "", "Quit"),
];

fn format_command(out: &mut String, command: &Command) {
    out.push_str(&format!(
        "  - {:<30} {:<50} {}\n",
        command.name, command.params, command.description
    ));
}

/// Render every menu's commands followed by the common ones. Lines end in
/// CRLF so the table stays aligned while the terminal is in raw mode.
pub fn render_help(registry: &MenuRegistry) -> String {
    let mut out = String::new();
    for menu in registry.menus() {
        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(&format!("{}:\n", menu.name));
        for command in &menu.commands {
            format_command(&mut out, command);
        }
    }
    out.push_str(SEPARATOR);
    out.push_str("\ncommon:\n");
    for (name, params, description) in COMMON_COMMANDS {
        format_command(&mut out, &Command::new(name, params, description));
    }
    out.replace('\n', "\r\n")
}

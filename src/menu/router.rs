use super::registry::MenuRegistry;

/// Line the controller accepts to leave a submenu for the root menu.
pub const RETURN_COMMAND: &str = "back";
/// Prefix of the line that enters a submenu from the root menu.
pub const ENTER_COMMAND: &str = "menu";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    ReturnToRoot,
    Enter(String),
}

impl NavCommand {
    pub fn to_line(&self) -> String {
        match self {
            NavCommand::ReturnToRoot => format!("{RETURN_COMMAND}\n"),
            NavCommand::Enter(menu) => format!("{ENTER_COMMAND} {menu}\n"),
        }
    }
}

/// Synthetic lines that must reach the controller before the user's line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    pub commands: Vec<NavCommand>,
}

impl Navigation {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.commands
            .iter()
            .flat_map(|command| command.to_line().into_bytes())
            .collect()
    }
}

/// First whitespace-delimited token of a line.
pub fn command_name(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Plan the moves from `current` to `target`. Submenus only connect through
/// the root, so a sibling switch always returns first.
pub fn plan(root: &str, current: &str, target: &str) -> Navigation {
    let mut commands = Vec::new();
    if current != target {
        if current != root {
            commands.push(NavCommand::ReturnToRoot);
        }
        if target != root {
            commands.push(NavCommand::Enter(target.to_string()));
        }
    }
    Navigation { commands }
}

/// Tracks which menu the controller is in and injects the navigation needed
/// to run each submitted line in the menu that owns it.
#[derive(Debug, Clone)]
pub struct MenuRouter {
    registry: MenuRegistry,
    current: String,
}

impl MenuRouter {
    pub fn new(registry: MenuRegistry) -> Self {
        let current = registry.root().to_string();
        Self { registry, current }
    }

    pub fn registry(&self) -> &MenuRegistry {
        &self.registry
    }

    pub fn current_menu(&self) -> &str {
        &self.current
    }

    /// Unknown commands stay in the current menu so the controller can
    /// report them itself.
    pub fn route(&mut self, line: &str) -> Navigation {
        let Some(target) = command_name(line).and_then(|name| self.registry.owner(name)) else {
            return Navigation::default();
        };
        let navigation = plan(self.registry.root(), &self.current, target);
        if self.current != target {
            crate::log_debug(&format!("menu transition: {} -> {target}", self.current));
            tracing::info!(from = %self.current, to = %target, "menu transition");
            self.current = target.to_string();
        }
        navigation
    }
}

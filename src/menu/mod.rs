//! Menu registry and the router that keeps the controller in the menu owning
//! each submitted command.

mod help;
mod registry;
mod router;

pub use help::render_help;
pub use registry::{Command, Menu, MenuRegistry, RegistryError, DEFAULT_ROOT_MENU};
pub use router::{
    command_name, plan, MenuRouter, NavCommand, Navigation, ENTER_COMMAND, RETURN_COMMAND,
};

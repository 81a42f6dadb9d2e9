//! Raw keyboard byte interpreter: classifies control keys and escape
//! sequences, assembles command lines and hands them to the menu router.

mod classify;
mod interpreter;
mod token;


pub use classify::classify;
pub use interpreter::{classify_line, InputInterpreter, LineKind};
pub use token::{Action, ControlKey, EndReason, EscapeKey, InputError, Scan, Token};

//! Built-in commands of the `validators-rs` binary.

pub mod check;
pub mod parse_date;

pub use check::CheckCommand;
pub use parse_date::ParseDateCommand;

use crate::command::CommandRegistry;

/// Registers every built-in command.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(CheckCommand));
    registry.register(Box::new(ParseDateCommand));
}

//! The `/mbotc` slash command.

pub mod handlers;
pub mod parser;
pub mod router;

pub use handlers::{CommandContext, CommandHandler, TRIGGER, command_table, dispatch};
pub use parser::SlashCommand;
pub use router::{CommandTable, Resolved, split_command_line};

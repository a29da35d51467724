pub mod command;
pub mod terminal;
pub mod theme;
pub mod view;

pub use command::{command_to_app_event, parse_command, Command};
pub use terminal::TerminalSession;
pub use theme::Palette;

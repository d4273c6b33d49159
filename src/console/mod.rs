pub mod command;
pub mod input;
pub mod render;

pub use command::{Command, HELP};
pub use input::{spawn_line_reader, LineReceiver};

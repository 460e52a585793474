mod commands;
mod input;

pub use commands::{Cli, OutputFormat};
pub use input::read_input;

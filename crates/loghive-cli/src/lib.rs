mod args;
mod commands;
mod handlers;

pub use args::{Cli, Commands};
pub use commands::run;

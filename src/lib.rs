pub mod config;
mod fs;
mod path;
pub mod pipeline;
pub mod prompt;
mod subcommand;

pub use subcommand::{add, delete, deploy, init, SUCCESS_BANNER};

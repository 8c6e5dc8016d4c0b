pub mod output;
mod shell;
mod shell_context;
pub(crate) mod system;

pub use shell::run_cli;
pub use shell_context::{LoopControl, ShellContext};

use std::{
    env,
    ffi::OsString,
    path::PathBuf,
};

/// Environment variable naming the plugin directory.
pub const PLUGIN_DIR_ENV: &str = "PLUGIN_SHELL_DIR";
/// When set, lines are read from stdin without the line editor.
pub const SCRIPT_MODE_ENV: &str = "PLUGIN_SHELL_SCRIPT";
pub const DEFAULT_PLUGIN_DIR: &str = "commands";
pub const DEFAULT_PROMPT: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub plugin_dir: PathBuf,
    pub mode: CliMode,
    pub prompt: String,
    pub history_path: Option<PathBuf>,
}

impl Config {
    /// Reads the process arguments and environment.
    pub fn from_env() -> Self {
        Self::resolve(
            env::args_os().nth(1),
            env::var_os(PLUGIN_DIR_ENV),
            env::var_os(SCRIPT_MODE_ENV).is_some(),
        )
    }

    /// Plugin directory precedence: argument, then environment, then `./commands`.
    pub fn resolve(arg: Option<OsString>, env_dir: Option<OsString>, script: bool) -> Self {
        let plugin_dir = arg
            .filter(|dir| !dir.is_empty())
            .or(env_dir.filter(|dir| !dir.is_empty()))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLUGIN_DIR));
        let mode = if script {
            CliMode::Script
        } else {
            CliMode::Interactive
        };
        Self {
            plugin_dir,
            mode,
            prompt: DEFAULT_PROMPT.to_string(),
            history_path: default_history_path(),
        }
    }

    pub fn with_plugin_dir(plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
            mode: CliMode::Script,
            prompt: DEFAULT_PROMPT.to_string(),
            history_path: None,
        }
    }
}

fn default_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("plugin_shell").join("history.txt"))
}

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::cli::{output, system};
use crate::config::{CliMode, Config};
use crate::dispatch::{self, DispatchResult, LoopRequest, Session};
use crate::errors::{CliError, LoadDiagnostic};
use crate::loader::Loader;
use crate::registry::Registry;

/// What the read loop should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    /// The registry was rebuilt; completion candidates may have changed.
    Reloaded,
    Exit,
}

/// Top-level state owned by the shell: the registry, the loader that rebuilds
/// it and the session procedures write to.
pub struct ShellContext {
    mode: CliMode,
    plugin_dir: PathBuf,
    loader: Loader,
    registry: Registry,
    session: Session,
}

impl ShellContext {
    pub fn new(config: &Config) -> Result<Self, CliError> {
        Self::with_session(config, Session::stdout())
    }

    /// Performs the initial scan. A missing or unreadable plugin directory is fatal.
    pub fn with_session(config: &Config, session: Session) -> Result<Self, CliError> {
        let loader = Loader::default().with_builtins(system::entries());
        let report = loader.load(&config.plugin_dir)?;
        report_diagnostics(&report.diagnostics);
        info!(
            dir = %config.plugin_dir.display(),
            commands = report.registry.len(),
            "commands loaded"
        );

        Ok(Self {
            mode: config.mode,
            plugin_dir: config.plugin_dir.clone(),
            loader,
            registry: report.registry,
            session,
        })
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    pub fn command_names(&self) -> Vec<String> {
        self.registry.names().map(str::to_owned).collect()
    }

    /// Dispatches `line`, reports the outcome and applies any loop request.
    pub fn handle_line(&mut self, line: &str) -> LoopControl {
        let result = dispatch::dispatch(line, &self.registry, &mut self.session);
        report_result(&result);

        match self.session.take_request() {
            Some(LoopRequest::Exit) => LoopControl::Exit,
            Some(LoopRequest::Reload) => {
                self.reload();
                LoopControl::Reloaded
            }
            None => LoopControl::Continue,
        }
    }

    /// Rebuilds the registry from scratch and swaps it in.
    ///
    /// When the scan fails the previous registry stays active. Returns whether
    /// the swap happened.
    pub fn reload(&mut self) -> bool {
        match self.loader.load(&self.plugin_dir) {
            Ok(report) => {
                report_diagnostics(&report.diagnostics);
                self.registry = report.registry;
                output::info(format!(
                    "Reloaded {} commands from {}",
                    self.registry.len(),
                    self.plugin_dir.display()
                ));
                true
            }
            Err(err) => {
                warn!(error = %err, "reload failed; keeping current commands");
                output::error(format!("Reload failed, keeping current commands: {err}"));
                false
            }
        }
    }
}

fn report_diagnostics(diagnostics: &[LoadDiagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    output::section(format!("{} plugin problem(s)", diagnostics.len()));
    for diagnostic in diagnostics {
        output::warning(diagnostic);
    }
}

fn report_result(result: &DispatchResult) {
    match result {
        DispatchResult::NoOp | DispatchResult::Success { .. } => {}
        DispatchResult::UnknownCommand { token, suggestion } => {
            output::warning(format!(
                "Unknown command: {token}. Type 'help' for available commands."
            ));
            if let Some(best) = suggestion {
                output::info(format!("Did you mean `{best}`?"));
            }
        }
        DispatchResult::ExecutionFailure { command, detail } => {
            output::error(format!("Command `{command}` failed: {detail}"));
        }
    }
}

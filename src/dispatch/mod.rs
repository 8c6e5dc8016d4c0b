//! Resolves one input line to a registered command and runs it.
//!
//! Input is split on runs of whitespace only. Quoting, escapes and comments
//! are not recognised, so `say "a b"` yields the tokens `"a` and `b"`.

mod session;

use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
};

use serde_json::Value;
use strsim::levenshtein;
use tracing::{debug, warn};

use crate::errors::ProcedureError;
use crate::registry::Registry;

pub use session::{LoopRequest, Session};

/// Largest edit distance still offered as a "did you mean" suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Outcome of a single [`dispatch`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    /// The line held no tokens.
    NoOp,
    Success {
        command: String,
        value: Option<Value>,
    },
    UnknownCommand {
        token: String,
        suggestion: Option<String>,
    },
    /// The procedure returned an error or panicked.
    ExecutionFailure { command: String, detail: String },
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchResult::Success { .. })
    }
}

/// What a procedure sees while it runs.
pub struct CommandContext<'a> {
    name: &'a str,
    registry: &'a Registry,
    session: &'a mut Session,
}

impl<'a> CommandContext<'a> {
    pub fn new(name: &'a str, registry: &'a Registry, session: &'a mut Session) -> Self {
        Self {
            name,
            registry,
            session,
        }
    }

    /// Name the command was invoked under.
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn session(&mut self) -> &mut Session {
        self.session
    }

    /// Writes one line to the session output.
    pub fn println(&mut self, line: impl fmt::Display) -> Result<(), ProcedureError> {
        writeln!(self.session.output(), "{line}")?;
        Ok(())
    }

    pub fn request_exit(&mut self) {
        self.session.request(LoopRequest::Exit);
    }

    pub fn request_reload(&mut self) {
        self.session.request(LoopRequest::Reload);
    }
}

pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Runs `line` against `registry`.
///
/// Performs one lookup and, on a hit, one invocation. Errors and panics from
/// the procedure are converted into [`DispatchResult::ExecutionFailure`] and
/// never reach the caller.
pub fn dispatch(line: &str, registry: &Registry, session: &mut Session) -> DispatchResult {
    let tokens = tokenize(line);
    let Some((command, args)) = tokens.split_first() else {
        return DispatchResult::NoOp;
    };

    let Some(entry) = registry.lookup(command) else {
        debug!(token = %command, "unknown command");
        return DispatchResult::UnknownCommand {
            token: command.clone(),
            suggestion: suggest(registry, command),
        };
    };

    debug!(command = entry.name(), args = args.len(), "dispatching");
    let procedure = entry.procedure();
    let outcome = {
        let mut context = CommandContext::new(entry.name(), registry, session);
        panic::catch_unwind(AssertUnwindSafe(|| procedure(&mut context, args)))
    };
    if let Err(err) = session.output().flush() {
        debug!(error = %err, "failed to flush session output");
    }

    match outcome {
        Ok(Ok(value)) => DispatchResult::Success {
            command: command.clone(),
            value,
        },
        Ok(Err(err)) => {
            warn!(command = %command, error = %err, "command failed");
            DispatchResult::ExecutionFailure {
                command: command.clone(),
                detail: err.to_string(),
            }
        }
        Err(payload) => {
            let detail = format!("panicked: {}", panic_message(payload.as_ref()));
            warn!(command = %command, %detail, "command panicked");
            DispatchResult::ExecutionFailure {
                command: command.clone(),
                detail,
            }
        }
    }
}

fn suggest(registry: &Registry, token: &str) -> Option<String> {
    registry
        .names()
        .map(|name| (levenshtein(name, token), name))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min()
        .map(|(_, name)| name.to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

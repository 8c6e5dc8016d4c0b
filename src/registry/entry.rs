use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde_json::Value;

use crate::dispatch::CommandContext;
use crate::errors::ProcedureError;

/// What a procedure produces: an optional value for programmatic callers.
pub type ProcedureResult = Result<Option<Value>, ProcedureError>;

/// Callable bound to a command name. Receives the tokens after the command name.
pub type Procedure =
    Arc<dyn Fn(&mut CommandContext<'_>, &[String]) -> ProcedureResult + Send + Sync>;

/// Where an entry came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    BuiltIn,
    File(PathBuf),
}

impl Origin {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Origin::BuiltIn => None,
            Origin::File(path) => Some(path),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::BuiltIn => write!(f, "<built-in>"),
            Origin::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A validated command description.
///
/// Entries are assembled with the `with_*` builders and become read-only once
/// handed to a [`Registry`](super::Registry).
#[derive(Clone)]
pub struct CommandEntry {
    name: String,
    description: String,
    usage: String,
    origin: Origin,
    procedure: Procedure,
}

impl CommandEntry {
    pub fn new<F>(name: impl Into<String>, procedure: F) -> Self
    where
        F: Fn(&mut CommandContext<'_>, &[String]) -> ProcedureResult + Send + Sync + 'static,
    {
        Self::from_procedure(name, Arc::new(procedure))
    }

    pub fn from_procedure(name: impl Into<String>, procedure: Procedure) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            usage: String::new(),
            origin: Origin::BuiltIn,
            procedure,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    /// Hidden entries are left out of help listings but still dispatch.
    pub fn is_hidden(&self) -> bool {
        self.description.is_empty()
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

use std::{
    io,
    path::{Path, PathBuf},
    process::ExitStatus,
};

use thiserror::Error;

use crate::registry::Origin;

/// Fatal loader failures. Without a readable plugin directory no command can exist.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("plugin directory `{}` does not exist", .0.display())]
    DirectoryMissing(PathBuf),
    #[error("plugin path `{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("plugin directory `{}` is not readable: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Non-fatal problems found while scanning plugin files.
///
/// These are collected during a scan and reported as one batch afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadDiagnostic {
    /// The file could not be read or parsed; none of its commands were registered.
    #[error("LoadError: {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },
    /// A declared command had missing or mistyped fields.
    #[error("SchemaError: {}: {location}: {message}", .path.display())]
    Schema {
        path: PathBuf,
        location: String,
        message: String,
    },
    /// A declared command reused a name that was registered earlier.
    #[error(
        "DuplicateNameError: {}: command `{name}` is already registered by {holder}",
        .rejected.display()
    )]
    DuplicateName {
        name: String,
        rejected: PathBuf,
        holder: Origin,
    },
}

impl LoadDiagnostic {
    /// The plugin file the diagnostic refers to.
    pub fn path(&self) -> &Path {
        match self {
            LoadDiagnostic::Load { path, .. } | LoadDiagnostic::Schema { path, .. } => path,
            LoadDiagnostic::DuplicateName { rejected, .. } => rejected,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LoadDiagnostic::Load { .. } => "LoadError",
            LoadDiagnostic::Schema { .. } => "SchemaError",
            LoadDiagnostic::DuplicateName { .. } => "DuplicateNameError",
        }
    }
}

/// Faults raised by a command procedure while it runs.
#[derive(Debug, Error)]
pub enum ProcedureError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` finished with {status}")]
    ExitStatus { program: String, status: ExitStatus },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors that end the interactive host.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

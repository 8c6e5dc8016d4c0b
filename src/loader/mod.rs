//! Discovers plugin files and builds a [`Registry`] from their declarations.

pub mod manifest;

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::errors::{LoadDiagnostic, LoaderError};
use crate::procedures::{external, ProcedureTable};
use crate::registry::{CommandEntry, Origin, Procedure, Registry};

use manifest::{CommandDecl, ProcedureRef};

/// Extension a file needs to be treated as a plugin.
pub const PLUGIN_EXTENSION: &str = "toml";
/// Files whose name starts with this marker are private and never scanned.
pub const PRIVATE_PREFIX: char = '_';

/// Result of one scan: the populated registry plus every non-fatal problem.
#[derive(Debug)]
pub struct LoadReport {
    pub registry: Registry,
    pub diagnostics: Vec<LoadDiagnostic>,
}

/// Builds registries from a plugin directory.
///
/// Built-in entries are inserted ahead of any plugin so plugins cannot
/// shadow them. Each call to [`Loader::load`] starts from a fresh registry.
pub struct Loader {
    table: ProcedureTable,
    builtins: Vec<CommandEntry>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(ProcedureTable::standard())
    }
}

impl Loader {
    pub fn new(table: ProcedureTable) -> Self {
        Self {
            table,
            builtins: Vec::new(),
        }
    }

    pub fn with_builtins(mut self, entries: impl IntoIterator<Item = CommandEntry>) -> Self {
        self.builtins.extend(entries);
        self
    }

    /// Scans `dir` and registers every valid declaration.
    ///
    /// Only a missing or unreadable directory is an error; problems with
    /// individual files are collected in [`LoadReport::diagnostics`].
    pub fn load(&self, dir: &Path) -> Result<LoadReport, LoaderError> {
        let files = scan(dir)?;
        let mut registry = Registry::new();
        let mut diagnostics = Vec::new();

        for entry in &self.builtins {
            if !registry.insert(entry.clone()) {
                warn!(command = entry.name(), "built-in command registered twice");
            }
        }
        for path in &files {
            self.load_file(path, &mut registry, &mut diagnostics);
        }

        info!(
            dir = %dir.display(),
            files = files.len(),
            commands = registry.len(),
            diagnostics = diagnostics.len(),
            "plugin scan finished"
        );
        Ok(LoadReport {
            registry,
            diagnostics,
        })
    }

    fn load_file(
        &self,
        path: &Path,
        registry: &mut Registry,
        diagnostics: &mut Vec<LoadDiagnostic>,
    ) {
        debug!(path = %path.display(), "loading plugin file");
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                diagnostics.push(LoadDiagnostic::Load {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                });
                return;
            }
        };
        let declarations = match manifest::parse(&source) {
            Ok(declarations) => declarations,
            Err(err) => {
                let line = err
                    .span()
                    .and_then(|span| source.get(..span.start))
                    .map(|before| before.matches('\n').count() + 1);
                let message = match line {
                    Some(line) => format!("line {line}: {}", err.message()),
                    None => err.message().to_string(),
                };
                diagnostics.push(LoadDiagnostic::Load {
                    path: path.to_path_buf(),
                    message,
                });
                return;
            }
        };
        if declarations.is_empty() {
            info!(path = %path.display(), "no command declarations found");
            return;
        }

        let workdir = path.parent().unwrap_or_else(|| Path::new("."));
        for declaration in declarations {
            let declaration = match declaration {
                Ok(declaration) => declaration,
                Err(violation) => {
                    diagnostics.push(LoadDiagnostic::Schema {
                        path: path.to_path_buf(),
                        location: violation.location,
                        message: violation.message,
                    });
                    continue;
                }
            };

            let name = declaration.name.clone();
            let entry = match self.bind(declaration, path, workdir) {
                Ok(entry) => entry,
                Err(message) => {
                    diagnostics.push(LoadDiagnostic::Schema {
                        path: path.to_path_buf(),
                        location: format!("command `{name}`"),
                        message,
                    });
                    continue;
                }
            };

            if registry.insert(entry) {
                debug!(command = %name, path = %path.display(), "registered command");
            } else {
                let holder = registry
                    .lookup(&name)
                    .map(|existing| existing.origin().clone())
                    .unwrap_or(Origin::BuiltIn);
                diagnostics.push(LoadDiagnostic::DuplicateName {
                    name,
                    rejected: path.to_path_buf(),
                    holder,
                });
            }
        }
    }

    fn bind(&self, decl: CommandDecl, path: &Path, workdir: &Path) -> Result<CommandEntry, String> {
        let procedure: Procedure = match decl.procedure {
            ProcedureRef::Symbol(symbol) => self
                .table
                .resolve(&symbol)
                .ok_or_else(|| format!("procedure symbol `{symbol}` not found"))?,
            ProcedureRef::Exec(mut argv) => {
                let program = argv.remove(0);
                external::exec(&program, argv, workdir)
            }
            ProcedureRef::Template(text) => external::template(text),
        };
        Ok(CommandEntry::from_procedure(decl.name, procedure)
            .with_description(decl.description)
            .with_usage(decl.usage)
            .with_origin(Origin::File(path.to_path_buf())))
    }
}

/// Lists the plugin files in `dir`, sorted by file name.
pub fn scan(dir: &Path) -> Result<Vec<PathBuf>, LoaderError> {
    if !dir.exists() {
        return Err(LoaderError::DirectoryMissing(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(LoaderError::NotADirectory(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| LoaderError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if is_plugin_file(&path) {
                    files.push(path);
                }
            }
            Err(err) => warn!(dir = %dir.display(), error = %err, "skipping unreadable entry"),
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_plugin_file(path: &Path) -> bool {
    let public = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| !name.starts_with(PRIVATE_PREFIX));
    let script = path
        .extension()
        .is_some_and(|ext| ext == PLUGIN_EXTENSION);
    public && script && path.is_file()
}

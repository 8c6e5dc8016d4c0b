//! Reads the `[[command]]` declarations out of a plugin file.
//!
//! A plugin file is a TOML document. The only key inspected is the
//! well-known `command` array; every other top-level value belongs to the
//! plugin author and is ignored.

use serde::Deserialize;
use toml::{Table, Value};

/// Top-level key holding a plugin's command declarations.
pub const REGISTRATION_KEY: &str = "command";

/// A well-formed command declaration, not yet bound to a procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDecl {
    pub name: String,
    pub description: String,
    pub usage: String,
    pub procedure: ProcedureRef,
}

/// How a declaration names its procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcedureRef {
    /// Compiled-in procedure looked up by name.
    Symbol(String),
    /// External program and its leading arguments.
    Exec(Vec<String>),
    Template(String),
}

/// Why a declaration was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub location: String,
    pub message: String,
}

impl SchemaViolation {
    fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum InlineProcedure {
    Exec(ExecLine),
    Template(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExecLine {
    Line(String),
    Argv(Vec<String>),
}

/// Parses `source`, returning one result per declared command.
///
/// A TOML syntax error fails the whole file.
pub fn parse(source: &str) -> Result<Vec<Result<CommandDecl, SchemaViolation>>, toml::de::Error> {
    let document: Table = source.parse()?;
    let Some(declared) = document.get(REGISTRATION_KEY) else {
        return Ok(Vec::new());
    };
    let Some(items) = declared.as_array() else {
        return Ok(vec![Err(SchemaViolation::new(
            REGISTRATION_KEY,
            format!("expected an array of tables, found {}", declared.type_str()),
        ))]);
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| declaration(index, item))
        .collect())
}

fn declaration(index: usize, item: &Value) -> Result<CommandDecl, SchemaViolation> {
    let location = format!("{REGISTRATION_KEY}[{index}]");
    let Some(table) = item.as_table() else {
        return Err(SchemaViolation::new(
            location,
            format!("expected a table, found {}", item.type_str()),
        ));
    };

    let name = match table.get("name") {
        None => return Err(SchemaViolation::new(location, "missing required key `name`")),
        Some(Value::String(name)) if is_valid_name(name) => name.clone(),
        Some(Value::String(name)) => {
            return Err(SchemaViolation::new(
                location,
                format!("`name` must be a non-empty word without whitespace, found {name:?}"),
            ))
        }
        Some(other) => {
            return Err(SchemaViolation::new(
                location,
                format!("`name` must be a string, found {}", other.type_str()),
            ))
        }
    };

    let location = format!("{location} `{name}`");
    let procedure = match table.get("procedure") {
        None => {
            return Err(SchemaViolation::new(
                location,
                "missing required key `procedure`",
            ))
        }
        Some(value) => procedure_ref(value).map_err(|message| SchemaViolation::new(location, message))?,
    };

    Ok(CommandDecl {
        name,
        description: optional_text(table, "description"),
        usage: optional_text(table, "usage"),
        procedure,
    })
}

fn procedure_ref(value: &Value) -> Result<ProcedureRef, String> {
    match value {
        Value::String(symbol) if !symbol.trim().is_empty() => {
            Ok(ProcedureRef::Symbol(symbol.trim().to_string()))
        }
        Value::String(_) => Err("`procedure` symbol must not be empty".into()),
        Value::Table(_) => {
            let inline: InlineProcedure = value
                .clone()
                .try_into()
                .map_err(|err| format!("invalid `procedure` table: {}", err.message()))?;
            match inline {
                InlineProcedure::Template(text) => Ok(ProcedureRef::Template(text)),
                InlineProcedure::Exec(line) => {
                    let argv = match line {
                        ExecLine::Line(line) => shell_words::split(&line)
                            .map_err(|err| format!("invalid `exec` command line: {err}"))?,
                        ExecLine::Argv(argv) => argv,
                    };
                    if argv.first().map_or(true, |program| program.is_empty()) {
                        return Err("`exec` needs a program to run".into());
                    }
                    Ok(ProcedureRef::Exec(argv))
                }
            }
        }
        other => Err(format!(
            "`procedure` must be a symbol or a table, found {}",
            other.type_str()
        )),
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

fn optional_text(table: &Table, key: &str) -> String {
    table
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

//! Procedures declared inline in a plugin file: external programs and text templates.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::Arc,
};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

use crate::dispatch::CommandContext;
use crate::errors::ProcedureError;
use crate::registry::{Procedure, ProcedureResult};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(ARGUMENTS|\d+)").expect("placeholder pattern compiles"));

/// Runs `program` with `fixed` arguments followed by the dispatched tokens.
///
/// The child runs inside `workdir`; its stdout is copied to the session output
/// and returned as the result value. A non-zero exit is a fault.
pub fn exec(program: &str, fixed: Vec<String>, workdir: &Path) -> Procedure {
    let program = resolve_program(program, workdir);
    let label = program.display().to_string();
    let workdir = workdir.to_path_buf();

    Arc::new(move |ctx: &mut CommandContext<'_>, args: &[String]| -> ProcedureResult {
        debug!(program = %label, args = args.len(), "spawning plugin program");
        let output = Command::new(&program)
            .args(&fixed)
            .args(args)
            .current_dir(&workdir)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| ProcedureError::Spawn {
                program: label.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        ctx.session().output().write_all(stdout.as_bytes())?;
        if !output.status.success() {
            return Err(ProcedureError::ExitStatus {
                program: label.clone(),
                status: output.status,
            });
        }
        Ok(Some(Value::String(stdout)))
    })
}

/// Writes the expanded template and returns it.
pub fn template(text: String) -> Procedure {
    Arc::new(move |ctx: &mut CommandContext<'_>, args: &[String]| -> ProcedureResult {
        let expanded = expand(&text, args);
        ctx.println(&expanded)?;
        Ok(Some(Value::String(expanded)))
    })
}

/// `$ARGUMENTS` becomes every token joined by a space, `$N` the N-th token.
pub fn expand(template: &str, args: &[String]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "ARGUMENTS" => args.join(" "),
            index => index
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|n| args.get(n))
                .cloned()
                .unwrap_or_default(),
        })
        .into_owned()
}

// Paths like `./run.sh` or `bin/tool` belong to the plugin directory; bare
// names go through PATH.
fn resolve_program(program: &str, workdir: &Path) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        workdir.join(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn expand_substitutes_placeholders() {
        let tokens = args(&["world", "again"]);
        assert_eq!(expand("Hello, $1!", &tokens), "Hello, world!");
        assert_eq!(expand("[$ARGUMENTS]", &tokens), "[world again]");
        assert_eq!(expand("$2 $3.", &tokens), "again .");
        assert_eq!(expand("cost: $0", &tokens), "cost: ");
        assert_eq!(expand("no placeholders", &tokens), "no placeholders");
    }

    #[test]
    fn program_paths_resolve_against_the_plugin_directory() {
        let dir = Path::new("/plugins");
        assert_eq!(resolve_program("./run.sh", dir), PathBuf::from("/plugins/./run.sh"));
        assert_eq!(resolve_program("bin/tool", dir), PathBuf::from("/plugins/bin/tool"));
        assert_eq!(resolve_program("echo", dir), PathBuf::from("echo"));
        assert_eq!(resolve_program("/usr/bin/env", dir), PathBuf::from("/usr/bin/env"));
    }
}

//! `plugins`: lists the plugin files that contributed commands.

use std::{collections::BTreeMap, path::Path};

use glob::Pattern;
use serde_json::Value;

use crate::dispatch::CommandContext;
use crate::errors::ProcedureError;
use crate::registry::{Origin, ProcedureResult};

/// With no arguments lists every plugin as `stem: path`; otherwise lists the
/// stems matching any of the glob patterns given.
pub fn run(ctx: &mut CommandContext<'_>, args: &[String]) -> ProcedureResult {
    let mut plugins: BTreeMap<&str, &Path> = BTreeMap::new();
    for entry in ctx.registry().all() {
        if let Origin::File(path) = entry.origin() {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                plugins.entry(stem).or_insert(path.as_path());
            }
        }
    }

    if args.is_empty() {
        for (stem, path) in &plugins {
            ctx.println(format!("{stem}: {}", path.display()))?;
        }
        let stems: Vec<String> = plugins.keys().map(|stem| stem.to_string()).collect();
        return Ok(Some(Value::from(stems)));
    }

    let mut listed: Vec<String> = Vec::new();
    for raw in args {
        let pattern = Pattern::new(raw).map_err(|err| {
            ProcedureError::InvalidArguments(format!("Invalid pattern '{raw}': {err}"))
        })?;
        let mut matched = false;
        for (stem, path) in plugins.iter().filter(|(stem, _)| pattern.matches(stem)) {
            matched = true;
            if listed.iter().any(|seen| seen == stem) {
                continue;
            }
            listed.push(stem.to_string());
            ctx.println(format!("{stem}: {}", path.display()))?;
        }
        if !matched {
            ctx.println(format!("{raw}: (not loaded)"))?;
        }
    }
    Ok(Some(Value::from(listed)))
}

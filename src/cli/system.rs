//! Commands every shell has regardless of the plugin directory.

use crate::dispatch::CommandContext;
use crate::errors::ProcedureError;
use crate::help;
use crate::registry::{CommandEntry, ProcedureResult};

pub(crate) fn entries() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("help", cmd_help)
            .with_description("Show help message")
            .with_usage("help [command]"),
        CommandEntry::new("q", cmd_exit)
            .with_description("Quit the application")
            .with_usage("q"),
        CommandEntry::new("exit", cmd_exit).with_usage("exit"),
        CommandEntry::new("reload", cmd_reload)
            .with_description("Reload commands.")
            .with_usage("reload"),
    ]
}

fn cmd_help(ctx: &mut CommandContext<'_>, args: &[String]) -> ProcedureResult {
    let registry = ctx.registry();
    let Some(name) = args.first() else {
        for line in help::render(registry) {
            ctx.println(line)?;
        }
        return Ok(None);
    };

    let entry = registry.lookup(name).ok_or_else(|| {
        ProcedureError::InvalidArguments(format!(
            "Unknown command: {name}. Type 'help' for available commands."
        ))
    })?;
    let description = if entry.is_hidden() {
        "(hidden)"
    } else {
        entry.description()
    };
    let usage = if entry.usage().is_empty() {
        entry.name()
    } else {
        entry.usage()
    };
    ctx.println(format!("{}: {description}", entry.name()))?;
    ctx.println(format!("  usage : {usage}"))?;
    ctx.println(format!("  origin: {}", entry.origin()))?;
    Ok(None)
}

fn cmd_exit(ctx: &mut CommandContext<'_>, _args: &[String]) -> ProcedureResult {
    ctx.request_exit();
    Ok(None)
}

fn cmd_reload(ctx: &mut CommandContext<'_>, _args: &[String]) -> ProcedureResult {
    ctx.request_reload();
    Ok(None)
}

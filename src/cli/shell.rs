use std::{
    borrow::Cow,
    fs,
    io::{self, BufRead},
    path::Path,
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Context as ReadlineContext, Editor, Helper,
};
use tracing::debug;

use crate::cli::output;
use crate::cli::shell_context::{LoopControl, ShellContext};
use crate::config::{CliMode, Config};
use crate::errors::CliError;
use crate::utils;

pub fn run_cli(config: Config) -> Result<(), CliError> {
    let mut context = ShellContext::new(&config)?;
    utils::install_panic_hook();

    match context.mode() {
        CliMode::Interactive => run_interactive(&mut context, &config),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext, config: &Config) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    if let Some(path) = &config.history_path {
        if let Err(err) = editor.load_history(path) {
            debug!(path = %path.display(), error = %err, "no history loaded");
        }
    }
    output::info(format!(
        "Commands from {}. Type 'help' for available commands.",
        context.plugin_dir().display()
    ));

    loop {
        match editor.readline(&config.prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    editor.add_history_entry(trimmed).ok();
                }

                match context.handle_line(&line) {
                    LoopControl::Continue => {}
                    LoopControl::Reloaded => {
                        editor.set_helper(Some(CommandHelper::new(context.command_names())));
                    }
                    LoopControl::Exit => break,
                }
            }
            Err(ReadlineError::Interrupted) => {
                output::info("Interrupted, shutting down.");
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    if let Some(path) = &config.history_path {
        save_history(&mut editor, path);
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if context.handle_line(&line) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

fn save_history(editor: &mut Editor<CommandHelper, DefaultHistory>, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            debug!(path = %parent.display(), error = %err, "cannot create history directory");
            return;
        }
    }
    if let Err(err) = editor.save_history(path) {
        debug!(path = %path.display(), error = %err, "failed to save history");
    }
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(mut commands: Vec<String>) -> Self {
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn candidates(&self, needle: &str) -> Vec<Pair> {
        self.commands
            .iter()
            .filter(|name| name.starts_with(needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix.len() - prefix.trim_start().len();

        // Only the command word completes; arguments belong to the plugin.
        if prefix[start..].contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((start, self.candidates(&prefix[start..])))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}

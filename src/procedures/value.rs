//! `value`: a key/value store every plugin shares through the session.

use serde_json::{Map, Value};

use crate::dispatch::CommandContext;
use crate::errors::ProcedureError;
use crate::registry::ProcedureResult;

const USAGE: [(&str, &str); 3] = [
    ("get", "Get all values."),
    ("get <key>", "Get the value for the specified key."),
    ("set <key> <value>", "Set the value for the specified key."),
];

pub fn run(ctx: &mut CommandContext<'_>, args: &[String]) -> ProcedureResult {
    let Some((action, rest)) = args.split_first() else {
        let name = ctx.name();
        ctx.println("Usage:")?;
        for (form, summary) in USAGE {
            ctx.println(format_args!("  {name} {form} - {summary}"))?;
        }
        return Ok(None);
    };

    match action.as_str() {
        "get" => get(ctx, rest),
        "set" => set(ctx, rest),
        other => Err(ProcedureError::InvalidArguments(format!(
            "Unknown action '{other}' for '{}' command.",
            ctx.name()
        ))),
    }
}

fn get(ctx: &mut CommandContext<'_>, rest: &[String]) -> ProcedureResult {
    match rest {
        [] => {
            let snapshot: Map<String, Value> = ctx
                .session()
                .values()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            for (key, value) in &snapshot {
                ctx.println(format!("{key}={value}"))?;
            }
            Ok(Some(Value::Object(snapshot)))
        }
        [key] => {
            let value = ctx
                .session()
                .values()
                .get(key)
                .cloned()
                .ok_or_else(|| ProcedureError::Message(format!("'{key}' not found.")))?;
            ctx.println(&value)?;
            Ok(Some(value))
        }
        _ => Err(ProcedureError::InvalidArguments(format!(
            "Invalid arguments for '{} get' command.",
            ctx.name()
        ))),
    }
}

fn set(ctx: &mut CommandContext<'_>, rest: &[String]) -> ProcedureResult {
    let [key, raw] = rest else {
        return Err(ProcedureError::InvalidArguments(format!(
            "Invalid arguments for '{} set' command.",
            ctx.name()
        )));
    };

    let value: Value = serde_json::from_str(raw)?;
    if !(value.is_number() || value.is_string()) {
        return Err(ProcedureError::InvalidArguments(
            "Value must be a number or a string.".into(),
        ));
    }
    ctx.session().values_mut().insert(key.clone(), value.clone());
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dispatch::Session;
    use crate::registry::Registry;

    fn call(session: &mut Session, line: &[&str]) -> ProcedureResult {
        call_as("value", session, line)
    }

    fn call_as(name: &str, session: &mut Session, line: &[&str]) -> ProcedureResult {
        let registry = Registry::new();
        let args: Vec<String> = line.iter().map(|t| t.to_string()).collect();
        let mut ctx = CommandContext::new(name, &registry, session);
        run(&mut ctx, &args)
    }

    #[test]
    fn set_then_get() {
        let mut session = Session::new(std::io::sink());
        assert_eq!(call(&mut session, &["set", "n", "42"]).unwrap(), Some(json!(42)));
        call(&mut session, &["set", "s", "\"hi\""]).unwrap();

        assert_eq!(call(&mut session, &["get", "n"]).unwrap(), Some(json!(42)));
        assert_eq!(
            call(&mut session, &["get"]).unwrap(),
            Some(json!({"n": 42, "s": "hi"}))
        );
    }

    #[test]
    fn rejects_bad_input() {
        let mut session = Session::new(std::io::sink());
        let missing = call(&mut session, &["get", "nope"]).unwrap_err();
        assert_eq!(missing.to_string(), "'nope' not found.");

        assert!(matches!(
            call(&mut session, &["set", "k", "[1]"]),
            Err(ProcedureError::InvalidArguments(_))
        ));
        assert!(matches!(
            call(&mut session, &["set", "k", "not-json"]),
            Err(ProcedureError::Json(_))
        ));
        assert!(call(&mut session, &["set", "k"]).is_err());
        assert!(call(&mut session, &["drop"]).is_err());
        assert!(session.values().is_empty());
    }

    #[test]
    fn no_arguments_prints_usage() {
        let mut session = Session::new(std::io::sink());
        assert_eq!(call(&mut session, &[]).unwrap(), None);
    }

    #[test]
    fn messages_use_the_invoked_name() {
        let mut session = Session::new(std::io::sink());
        let err = call_as("memo", &mut session, &["get", "a", "b"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid arguments for 'memo get' command.");
        let err = call_as("memo", &mut session, &["drop"]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown action 'drop' for 'memo' command.");
    }
}

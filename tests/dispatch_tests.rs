mod common;

use assert_fs::TempDir;
use plugin_shell::{dispatch, DispatchResult, Loader, Registry};
use serde_json::json;

use common::{plugin_dir, Capture, ARITHMETIC, ECHO};

fn load(files: &[(&str, &str)]) -> Registry {
    load_kept(files).1
}

// Exec procedures run inside the plugin directory, so it has to outlive dispatch.
fn load_kept(files: &[(&str, &str)]) -> (TempDir, Registry) {
    let dir = plugin_dir(files);
    let report = Loader::default().load(dir.path()).unwrap();
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    (dir, report.registry)
}

#[test]
fn echo_plugin_returns_its_arguments() {
    let registry = load(&[("echo.toml", ECHO)]);
    let capture = Capture::default();
    let mut session = capture.session();

    let result = dispatch("echo a b c", &registry, &mut session);

    assert_eq!(
        result,
        DispatchResult::Success {
            command: "echo".into(),
            value: Some(json!(["a", "b", "c"])),
        }
    );
    assert_eq!(capture.text(), "a b c\n");
}

#[test]
fn template_plugin_expands_arguments() {
    let registry = load(&[("arithmetic.toml", ARITHMETIC)]);
    let capture = Capture::default();

    let result = dispatch("add 2 3", &registry, &mut capture.session());

    assert_eq!(
        result,
        DispatchResult::Success {
            command: "add".into(),
            value: Some(json!("2 + 3")),
        }
    );
    assert_eq!(capture.text(), "2 + 3\n");
}

#[test]
fn empty_and_unknown_input_never_invoke_a_procedure() {
    let registry = load(&[("echo.toml", ECHO)]);
    let capture = Capture::default();
    let mut session = capture.session();

    assert_eq!(dispatch("", &registry, &mut session), DispatchResult::NoOp);
    assert_eq!(
        dispatch("frobnicate", &registry, &mut session),
        DispatchResult::UnknownCommand {
            token: "frobnicate".into(),
            suggestion: None,
        }
    );
    assert_eq!(
        dispatch("ECHO loud", &registry, &mut session),
        DispatchResult::UnknownCommand {
            token: "ECHO".into(),
            suggestion: None,
        }
    );
    assert!(capture.text().is_empty());
}

#[test]
fn a_failing_command_does_not_affect_the_next_one() {
    let store = r#"
[[command]]
name = "value"
description = "Set/Get a value."
procedure = "value"
"#;
    let registry = load(&[("echo.toml", ECHO), ("store.toml", store)]);
    let mut session = Capture::default().session();

    match dispatch("value get missing", &registry, &mut session) {
        DispatchResult::ExecutionFailure { command, detail } => {
            assert_eq!(command, "value");
            assert_eq!(detail, "'missing' not found.");
        }
        other => panic!("expected a failure, got {other:?}"),
    }
    assert!(dispatch("echo fine", &registry, &mut session).is_success());
}

#[test]
fn plugins_share_values_through_the_session() {
    let writer = "[[command]]\nname = \"remember\"\nprocedure = \"value\"\n";
    let reader = "[[command]]\nname = \"recall\"\nprocedure = \"value\"\n";
    let registry = load(&[("writer.toml", writer), ("reader.toml", reader)]);
    let capture = Capture::default();
    let mut session = capture.session();

    assert!(dispatch("remember set answer 42", &registry, &mut session).is_success());
    capture.clear();
    let result = dispatch("recall get answer", &registry, &mut session);

    assert_eq!(
        result,
        DispatchResult::Success {
            command: "recall".into(),
            value: Some(json!(42)),
        }
    );
    assert_eq!(capture.text(), "42\n");
}

#[test]
fn plugins_command_lists_contributing_files() {
    let listing = "[[command]]\nname = \"plugins\"\nprocedure = \"plugins\"\n";
    let registry = load(&[
        ("arithmetic.toml", ARITHMETIC),
        ("echo.toml", ECHO),
        ("listing.toml", listing),
    ]);
    let capture = Capture::default();
    let mut session = capture.session();

    let all = dispatch("plugins", &registry, &mut session);
    assert_eq!(
        all,
        DispatchResult::Success {
            command: "plugins".into(),
            value: Some(json!(["arithmetic", "echo", "listing"])),
        }
    );

    capture.clear();
    let filtered = dispatch("plugins ar* nothing", &registry, &mut session);
    assert_eq!(
        filtered,
        DispatchResult::Success {
            command: "plugins".into(),
            value: Some(json!(["arithmetic"])),
        }
    );
    let text = capture.text();
    assert!(text.starts_with("arithmetic: "));
    assert!(text.ends_with("nothing: (not loaded)\n"));
}

#[cfg(unix)]
mod external {
    use super::*;

    #[test]
    fn exec_plugin_appends_arguments() {
        let plugin = "[[command]]\nname = \"say\"\nprocedure = { exec = \"echo from-exec\" }\n";
        let (_dir, registry) = load_kept(&[("say.toml", plugin)]);
        let capture = Capture::default();

        let result = dispatch("say a b", &registry, &mut capture.session());

        assert_eq!(
            result,
            DispatchResult::Success {
                command: "say".into(),
                value: Some(json!("from-exec a b\n")),
            }
        );
        assert_eq!(capture.text(), "from-exec a b\n");
    }

    #[test]
    fn exec_failures_become_execution_failures() {
        let plugin = r#"
[[command]]
name = "nope"
procedure = { exec = "false" }

[[command]]
name = "ghost"
procedure = { exec = "./missing-script.sh" }
"#;
        let (_dir, registry) = load_kept(&[("fail.toml", plugin)]);
        let mut session = Capture::default().session();

        assert!(matches!(
            dispatch("nope", &registry, &mut session),
            DispatchResult::ExecutionFailure { command, .. } if command == "nope"
        ));
        match dispatch("ghost", &registry, &mut session) {
            DispatchResult::ExecutionFailure { detail, .. } => {
                assert!(detail.contains("failed to start"), "{detail}");
                assert!(detail.contains("missing-script.sh"), "{detail}");
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }
}

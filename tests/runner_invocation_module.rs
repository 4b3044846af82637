use std::path::Path;
use sunbeam::extension::{FormItem, Mode, ParameterBinding, Script};
use sunbeam::runner::build_invocation;
use sunbeam::shared::PageError;

#[test]
fn runner_invocation_module_substitutes_params_per_token() {
    let script = Script::new("Greet", Mode::Detail, "./greet.sh --name {{ name }} {{loud}}")
        .with_param(FormItem::textfield("name"))
        .with_param(FormItem::checkbox("loud"));
    let binding = ParameterBinding::new()
        .with("name", "Ada Lovelace")
        .with("loud", true);
    let invocation =
        build_invocation("greet", &script, &binding, Path::new("/ext/hello")).expect("invocation");
    assert_eq!(invocation.program, "/ext/hello/./greet.sh");
    assert_eq!(
        invocation.args,
        vec![
            "--name".to_string(),
            "Ada Lovelace".to_string(),
            "true".to_string()
        ]
    );
    assert_eq!(invocation.cwd.as_deref(), Some(Path::new("/ext/hello")));
    assert_eq!(invocation.input, None);
}

#[test]
fn runner_invocation_module_missing_binding_is_error() {
    let script = Script::new("Greet", Mode::Detail, "echo {{name}}")
        .with_param(FormItem::textfield("name"));
    let err = build_invocation("greet", &script, &ParameterBinding::new(), Path::new("/tmp"))
        .expect_err("missing");
    assert!(matches!(
        err,
        PageError::MissingParameter { ref script, ref name } if script == "greet" && name == "name"
    ));
}

#[test]
fn runner_invocation_module_generator_injects_empty_query() {
    let script = Script::new("Search", Mode::Generator, "search {{query}}");
    let invocation = build_invocation("search", &script, &ParameterBinding::new(), Path::new("/tmp"))
        .expect("invocation");
    assert_eq!(invocation.program, "search");
    assert_eq!(invocation.args, vec![String::new()]);
}

#[test]
fn runner_invocation_module_input_template_is_rendered() {
    let mut script = Script::new("Upper", Mode::Raw, "tr a-z A-Z")
        .with_param(FormItem::textfield("text"));
    script.input = Some("{{ text }}\n".to_string());
    let binding = ParameterBinding::new().with("text", "hello");
    let invocation =
        build_invocation("upper", &script, &binding, Path::new("/tmp")).expect("invocation");
    assert_eq!(invocation.input.as_deref(), Some("hello\n"));
}

#[test]
fn runner_invocation_module_undeclared_placeholders_stay_literal() {
    let script = Script::new("Echo", Mode::Raw, "echo {{ other }}");
    let invocation = build_invocation("echo", &script, &ParameterBinding::new(), Path::new("/tmp"))
        .expect("invocation");
    assert_eq!(invocation.args, vec!["{{other}}".to_string()]);
}

#[test]
fn runner_invocation_module_untokenizable_command_is_spawn_error() {
    let script = Script::new("Bad", Mode::Raw, "echo 'unterminated");
    let err = build_invocation("bad", &script, &ParameterBinding::new(), Path::new("/tmp"))
        .expect_err("spawn");
    assert!(matches!(err, PageError::Spawn { .. }));
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::BTreeMap;
use std::path::PathBuf;
use sunbeam::extension::{
    Extension, ExtensionRegistry, FormItem, Mode, ParameterBinding, RootItem, Script,
};
use sunbeam::protocol::{Action, ActionCommand, ListItem};
use sunbeam::runner::Invocation;
use sunbeam::shared::PageError;
use sunbeam::tui::{
    page_size, Command, EffectKind, ExitReason, InvokeRequest, ListView, Msg, Page, PageSize,
    PageStack, RunState, ViewportOptions,
};

fn demo_registry() -> ExtensionRegistry {
    let mut scripts = BTreeMap::new();
    scripts.insert(
        "feed".to_string(),
        Script::new("Feed", Mode::Filter, "./feed.sh"),
    );
    scripts.insert(
        "show".to_string(),
        Script::new("Show", Mode::Detail, "./show.sh {{ id }}").with_param(FormItem::textfield("id")),
    );
    scripts.insert(
        "edit".to_string(),
        Script::new("Edit", Mode::Silent, "vim notes.md"),
    );
    let demo = Extension {
        name: "demo".to_string(),
        dir: PathBuf::from("/ext/demo"),
        title: "Demo".to_string(),
        description: "Demo extension".to_string(),
        scripts,
        root_items: vec![RootItem {
            title: "Feed".to_string(),
            subtitle: String::new(),
            script: "feed".to_string(),
            params: ParameterBinding::new(),
        }],
    };
    ExtensionRegistry::from_extensions([demo])
}

fn terminal() -> PageSize {
    PageSize::new(80, 24)
}

fn key(code: KeyCode) -> Msg {
    Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(c: char) -> Msg {
    Msg::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn single_invoke(commands: Vec<Command>) -> InvokeRequest {
    match commands.as_slice() {
        [Command::Invoke(request)] => request.clone(),
        other => panic!("expected a single invoke, got {other:?}"),
    }
}

fn copy_list(content: &str) -> Page {
    Page::List(
        ListView::new("Copy").with_items(vec![ListItem::new("value")
            .with_action(Action::copy("Copy", content).with_shortcut("enter"))]),
    )
}

#[test]
fn tui_stack_module_root_lists_root_items_and_pushes_container() {
    let registry = demo_registry();
    let mut stack = PageStack::root(&registry, ViewportOptions::default(), terminal());
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.top().map(Page::title), Some("Sunbeam"));

    let request = single_invoke(stack.update(key(KeyCode::Enter)));
    assert_eq!(stack.len(), 2);
    assert_eq!(request.invocation.program, "/ext/demo/./feed.sh");
    let top = stack.top().expect("top");
    assert_eq!(top.size(), stack.size());
    assert_eq!(top.container().map(|c| c.id()), Some(request.container));
}

#[test]
fn tui_stack_module_script_failure_replaces_page_and_keeps_length() {
    let registry = demo_registry();
    let (mut stack, commands) = PageStack::for_script(
        &registry,
        ViewportOptions::default(),
        terminal(),
        "demo",
        "show",
        ParameterBinding::new().with("id", "42"),
    )
    .expect("stack");
    let request = single_invoke(commands);
    assert_eq!(stack.len(), 1);

    let follow_up = stack.update(Msg::RunFinished {
        container: request.container,
        generation: request.generation,
        result: Err(PageError::script_execution(Some(1), "boom")),
    });
    assert!(follow_up.is_empty());
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.top().and_then(Page::detail_text), Some("boom"));
}

#[test]
fn tui_stack_module_pop_shrinks_by_one_and_last_pop_quits() {
    let registry = demo_registry();
    let mut stack = PageStack::root(&registry, ViewportOptions::default(), terminal());
    stack.update(key(KeyCode::Enter));
    stack
        .push_script("demo", "show", ParameterBinding::new())
        .expect("push");
    assert_eq!(stack.len(), 3);

    stack.update(Msg::Resize {
        width: 120,
        height: 40,
    });
    assert!(stack.update(key(KeyCode::Esc)).is_empty());
    assert_eq!(stack.len(), 2);
    let expected = page_size(120, 40, &ViewportOptions::default());
    assert!(stack.pages().iter().all(|page| page.size() == expected));

    assert!(stack.update(key(KeyCode::Esc)).is_empty());
    assert_eq!(stack.len(), 1);
    assert_eq!(
        stack.update(key(KeyCode::Esc)),
        vec![Command::Quit(ExitReason::Popped)]
    );
    assert_eq!(stack.len(), 1);
}

#[test]
fn tui_stack_module_resize_reaches_every_page() {
    let registry = demo_registry();
    let options = ViewportOptions {
        max_width: 60,
        max_height: 0,
        padding: 1,
    };
    let mut stack = PageStack::root(&registry, options, terminal());
    stack.update(key(KeyCode::Enter));
    stack.update(Msg::Resize {
        width: 200,
        height: 50,
    });
    assert_eq!(stack.size(), PageSize::new(60, 46));
    assert_eq!(stack.terminal(), PageSize::new(200, 50));
    for page in stack.pages() {
        assert_eq!(page.size(), PageSize::new(60, 46));
    }
}

#[test]
fn tui_stack_module_copy_quits_after_effect_succeeds() {
    let registry = demo_registry();
    let mut stack = PageStack::new(&registry, ViewportOptions::default(), terminal(), copy_list("xyz"));
    assert_eq!(
        stack.update(key(KeyCode::Enter)),
        vec![Command::Copy("xyz".to_string())]
    );
    assert_eq!(
        stack.update(Msg::EffectFinished {
            effect: EffectKind::Copy,
            result: Ok(()),
        }),
        vec![Command::Quit(ExitReason::Copied)]
    );
}

#[test]
fn tui_stack_module_copy_is_dispatched_once_while_effect_runs() {
    let registry = demo_registry();
    let mut stack = PageStack::new(&registry, ViewportOptions::default(), terminal(), copy_list("xyz"));
    let mut commands = stack.update(key(KeyCode::Enter));
    assert!(stack.effect_pending());
    commands.extend(stack.update(key(KeyCode::Enter)));
    commands.extend(stack.update(key(KeyCode::Esc)));
    assert_eq!(commands, vec![Command::Copy("xyz".to_string())]);
    assert_eq!(stack.len(), 1);

    assert_eq!(
        stack.update(ctrl('c')),
        vec![Command::Quit(ExitReason::Interrupted)]
    );
    assert_eq!(
        stack.update(Msg::EffectFinished {
            effect: EffectKind::Copy,
            result: Ok(()),
        }),
        vec![Command::Quit(ExitReason::Copied)]
    );
    assert!(!stack.effect_pending());
}

#[test]
fn tui_stack_module_keys_resume_after_failed_effect() {
    let registry = demo_registry();
    let mut stack = PageStack::root(&registry, ViewportOptions::default(), terminal());
    stack.update(key(KeyCode::Enter));
    let feed = stack.top().and_then(Page::container).map(|c| c.id()).expect("feed");
    stack.update(Msg::RunFinished {
        container: feed,
        generation: 1,
        result: Ok(br#"[{"title":"post","actions":[{"title":"Open","type":"open","url":"https://example.com"}]}]"#.to_vec()),
    });
    assert_eq!(
        stack.update(key(KeyCode::Enter)),
        vec![Command::Open {
            url: "https://example.com".to_string(),
            application: None,
        }]
    );
    stack.update(Msg::EffectFinished {
        effect: EffectKind::Open,
        result: Err("no display".to_string()),
    });
    assert!(!stack.effect_pending());
    assert_eq!(stack.len(), 2);
    assert!(stack.update(key(KeyCode::Esc)).is_empty());
    assert_eq!(stack.len(), 1);
}

#[test]
fn tui_stack_module_failed_effect_becomes_error_page() {
    let registry = demo_registry();
    let mut stack = PageStack::new(&registry, ViewportOptions::default(), terminal(), copy_list("xyz"));
    stack.update(key(KeyCode::Enter));
    let commands = stack.update(Msg::EffectFinished {
        effect: EffectKind::Open,
        result: Err("no display".to_string()),
    });
    assert!(commands.is_empty());
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.top().and_then(Page::detail_text), Some("no display"));
}

#[test]
fn tui_stack_module_ctrl_c_interrupts_from_any_page() {
    let registry = demo_registry();
    let mut stack = PageStack::root(&registry, ViewportOptions::default(), terminal());
    stack.update(key(KeyCode::Enter));
    assert_eq!(
        stack.update(ctrl('c')),
        vec![Command::Quit(ExitReason::Interrupted)]
    );
}

#[test]
fn tui_stack_module_results_reach_buried_containers_only_while_alive() {
    let registry = demo_registry();
    let mut stack = PageStack::root(&registry, ViewportOptions::default(), terminal());
    let feed = single_invoke(stack.update(key(KeyCode::Enter)));
    let items = br#"[{"title":"post","actions":[
        {"title":"Show","type":"push","script":"show","params":{"id":"1"}},
        {"title":"Refresh","type":"reload","shortcut":"ctrl+r"}
    ]}]"#;
    stack.update(Msg::RunFinished {
        container: feed.container,
        generation: feed.generation,
        result: Ok(items.to_vec()),
    });

    let refresh = single_invoke(stack.update(ctrl('r')));
    assert_eq!(refresh.container, feed.container);
    let show = single_invoke(stack.update(key(KeyCode::Enter)));
    assert_eq!(stack.len(), 3);
    assert_ne!(show.container, feed.container);

    stack.update(Msg::RunFinished {
        container: refresh.container,
        generation: refresh.generation,
        result: Ok(br#"[{"title":"fresh"}]"#.to_vec()),
    });
    let buried = stack.container(feed.container).expect("feed container");
    assert_eq!(buried.list().expect("list").items()[0].title, "fresh");
    assert_eq!(
        stack.top().and_then(Page::container).map(|c| c.id()),
        Some(show.container)
    );

    stack.update(key(KeyCode::Esc));
    assert!(stack.container(show.container).is_none());
    let late = stack.update(Msg::RunFinished {
        container: show.container,
        generation: show.generation,
        result: Ok(b"too late".to_vec()),
    });
    assert!(late.is_empty());
    assert_eq!(stack.len(), 2);
}

#[test]
fn tui_stack_module_unknown_script_replaces_top_with_error() {
    let registry = demo_registry();
    let mut stack = PageStack::new(
        &registry,
        ViewportOptions::default(),
        terminal(),
        Page::List(ListView::new("Broken").with_items(vec![ListItem::new("x").with_action(
            Action::push("Go", "demo", "nope", ParameterBinding::new()),
        )])),
    );
    stack.update(key(KeyCode::Enter));
    assert_eq!(stack.len(), 1);
    assert!(stack
        .top()
        .and_then(Page::detail_text)
        .is_some_and(|text| text.contains("nope")));
}

#[test]
fn tui_stack_module_exec_runs_in_extension_dir_after_exit() {
    let registry = demo_registry();
    let mut action = Action::new(
        "Edit",
        ActionCommand::Exec {
            command: "git status".to_string(),
            silent: false,
        },
    );
    action.extension = "demo".to_string();
    let root = Page::List(
        ListView::new("Exec")
            .with_items(vec![ListItem::new("x").with_action(action.with_shortcut("enter"))]),
    );
    let mut stack = PageStack::new(&registry, ViewportOptions::default(), terminal(), root);
    assert_eq!(
        stack.update(key(KeyCode::Enter)),
        vec![Command::Quit(ExitReason::Exec {
            invocation: Invocation::shell("git status", Some(PathBuf::from("/ext/demo"))),
            silent: false,
        })]
    );
}

#[test]
fn tui_stack_module_silent_container_pops_after_interactive_success() {
    let registry = demo_registry();
    let mut stack = PageStack::root(&registry, ViewportOptions::default(), terminal());
    let commands = stack
        .push_script("demo", "edit", ParameterBinding::new())
        .expect("push");
    let request = match commands.as_slice() {
        [Command::RunInteractive(request)] => request.clone(),
        other => panic!("expected interactive command, got {other:?}"),
    };
    assert_eq!(stack.len(), 2);

    assert!(stack
        .update(Msg::InteractiveFinished {
            container: request.container,
            result: Ok(()),
        })
        .is_empty());
    assert_eq!(stack.len(), 1);
}

#[test]
fn tui_stack_module_silent_failure_turns_into_error_page() {
    let registry = demo_registry();
    let (mut stack, commands) = PageStack::for_script(
        &registry,
        ViewportOptions::default(),
        terminal(),
        "demo",
        "edit",
        ParameterBinding::new(),
    )
    .expect("stack");
    let Some(Command::RunInteractive(request)) = commands.into_iter().next() else {
        panic!("expected interactive command");
    };
    stack.update(Msg::InteractiveFinished {
        container: request.container,
        result: Err(PageError::script_execution(Some(2), "")),
    });
    let container = stack.top().and_then(Page::container).expect("container");
    assert_eq!(container.state(), RunState::Error);
    assert_eq!(
        stack.top().and_then(Page::detail_text),
        Some("script exited with status 2")
    );
}

#[test]
fn tui_stack_module_missing_params_push_a_form_without_invoking() {
    let registry = demo_registry();
    let mut stack = PageStack::root(&registry, ViewportOptions::default(), terminal());
    let commands = stack
        .push_script("demo", "show", ParameterBinding::new())
        .expect("push");
    assert!(commands.is_empty());
    let container = stack.top().and_then(Page::container).expect("container");
    assert_eq!(container.state(), RunState::NeedsInput);
}

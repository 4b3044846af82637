use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sunbeam::extension::ExtensionRegistry;
use sunbeam::protocol::{Action, ListItem};
use sunbeam::runner::Invocation;
use sunbeam::services::{ServiceError, Services};
use sunbeam::shared::Logger;
use sunbeam::tui::{
    dispatch, Command, Dispatched, ExitReason, InteractiveRequest, InvokeRequest, ListView, Msg,
    Page, PageSize, PageStack, Screen, ViewportOptions,
};
use tempfile::tempdir;

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct RecordingServices {
    calls: Mutex<Vec<String>>,
    fail_open: bool,
}

impl RecordingServices {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl Services for RecordingServices {
    fn copy(&self, content: &str) -> Result<(), ServiceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("copy:{content}"));
        }
        Ok(())
    }

    fn open(&self, target: &str, application: Option<&str>) -> Result<(), ServiceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("open:{target}:{}", application.unwrap_or("-")));
        }
        if self.fail_open {
            return Err(ServiceError::Clipboard("no display".to_string()));
        }
        Ok(())
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod");
    path
}

#[test]
fn tui_driver_module_copy_runs_once_then_quits() {
    let registry = ExtensionRegistry::default();
    let root = Page::List(ListView::new("Copy").with_items(vec![
        ListItem::new("value").with_action(Action::copy("Copy", "xyz").with_shortcut("enter")),
    ]));
    let mut stack = PageStack::new(&registry, ViewportOptions::default(), PageSize::new(80, 24), root);
    let services = Arc::new(RecordingServices::default());
    let (tx, rx) = mpsc::channel();
    let logger = Logger::disabled();

    let mut commands = stack.update(Msg::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    assert_eq!(commands, vec![Command::Copy("xyz".to_string())]);
    let dispatched = dispatch(commands.remove(0), &services, &tx, &logger);
    assert_eq!(dispatched, Dispatched::Background);

    let msg = rx.recv_timeout(WAIT).expect("effect result");
    assert_eq!(stack.update(msg), vec![Command::Quit(ExitReason::Copied)]);
    assert_eq!(services.calls(), vec!["copy:xyz".to_string()]);
}

#[test]
fn tui_driver_module_failed_open_reports_error_message() {
    let services = Arc::new(RecordingServices {
        fail_open: true,
        ..RecordingServices::default()
    });
    let (tx, rx) = mpsc::channel();
    let dispatched = dispatch(
        Command::Open {
            url: "https://example.com".to_string(),
            application: Some("firefox".to_string()),
        },
        &services,
        &tx,
        &Logger::disabled(),
    );
    assert_eq!(dispatched, Dispatched::Background);
    match rx.recv_timeout(WAIT).expect("effect result") {
        Msg::EffectFinished { result, .. } => {
            assert_eq!(result, Err("clipboard unavailable: no display".to_string()))
        }
        other => panic!("unexpected message {other:?}"),
    }
    assert_eq!(
        services.calls(),
        vec!["open:https://example.com:firefox".to_string()]
    );
}

#[test]
fn tui_driver_module_invoke_reports_stdout_and_logs() {
    let dir = tempdir().expect("tempdir");
    let script = write_script(dir.path(), "list.sh", r#"echo '[{"title":"from script"}]'"#);
    let log = dir.path().join("sunbeam.log");
    let services = Arc::new(RecordingServices::default());
    let (tx, rx) = mpsc::channel();
    let request = InvokeRequest {
        container: 3,
        generation: 2,
        invocation: Invocation {
            program: script.display().to_string(),
            args: Vec::new(),
            cwd: Some(dir.path().to_path_buf()),
            input: None,
        },
    };

    let dispatched = dispatch(Command::Invoke(request), &services, &tx, &Logger::to_file(&log));
    assert_eq!(dispatched, Dispatched::Background);
    match rx.recv_timeout(WAIT).expect("run result") {
        Msg::RunFinished {
            container,
            generation,
            result,
        } => {
            assert_eq!((container, generation), (3, 2));
            let stdout = result.expect("stdout");
            assert_eq!(String::from_utf8_lossy(&stdout).trim(), r#"[{"title":"from script"}]"#);
        }
        other => panic!("unexpected message {other:?}"),
    }

    let events = fs::read_to_string(&log)
        .expect("log")
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .filter_map(|value| value["event"].as_str().map(str::to_string))
        .collect::<Vec<_>>();
    assert_eq!(events.first().map(String::as_str), Some("runner.invoke"));
    assert!(events.iter().any(|event| event == "runner.done"));
}

#[test]
fn tui_driver_module_interactive_and_quit_pass_through() {
    let services = Arc::new(RecordingServices::default());
    let (tx, rx) = mpsc::channel();
    let logger = Logger::disabled();
    let request = InteractiveRequest {
        container: 1,
        invocation: Invocation::shell("true", None),
    };

    assert_eq!(
        dispatch(Command::RunInteractive(request.clone()), &services, &tx, &logger),
        Dispatched::Interactive(request)
    );
    assert_eq!(
        dispatch(Command::Quit(ExitReason::Popped), &services, &tx, &logger),
        Dispatched::Quit(ExitReason::Popped)
    );
    assert!(rx.try_recv().is_err());
    assert!(services.calls().is_empty());
}

#[test]
fn tui_driver_module_screen_follows_max_height() {
    assert_eq!(Screen::for_options(&ViewportOptions::default()), Screen::Alternate);
    assert_eq!(
        Screen::for_options(&ViewportOptions {
            max_width: 0,
            max_height: 10,
            padding: 1,
        }),
        Screen::Inline(14)
    );
}

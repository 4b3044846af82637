use crate::extension::ParameterBinding;
use crate::protocol::{Action, ActionCommand};
use crate::runner::Invocation;
use crate::shared::PageError;
use crossterm::event::KeyEvent;

/// Identifies one Run Container for the lifetime of the stack.
pub type ContainerId = u64;

/// Everything the page stack reacts to. Produced by the terminal or by
/// workers finishing a dispatched command.
#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Resize {
        width: u16,
        height: u16,
    },
    RunFinished {
        container: ContainerId,
        generation: u64,
        result: Result<Vec<u8>, PageError>,
    },
    InteractiveFinished {
        container: ContainerId,
        result: Result<(), PageError>,
    },
    EffectFinished {
        effect: EffectKind,
        result: Result<(), String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Copy,
    Open,
}

impl EffectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::Copy => "copy",
            EffectKind::Open => "open",
        }
    }
}

/// What a view asks of its owner after handling a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewIntent {
    Activate(Action),
    QueryChanged(String),
    Submit(ParameterBinding),
    Pop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeRequest {
    pub container: ContainerId,
    pub generation: u64,
    pub invocation: Invocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveRequest {
    pub container: ContainerId,
    pub invocation: Invocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Copy {
        content: String,
    },
    Open {
        url: String,
        application: Option<String>,
    },
    Exec {
        command: String,
        extension: String,
        silent: bool,
    },
    Exit,
}

/// What a page asks of the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageIntent {
    Push {
        extension: String,
        script: String,
        params: ParameterBinding,
    },
    Pop,
    Reload(ParameterBinding),
    Invoke(InvokeRequest),
    Interactive(InteractiveRequest),
    Effect(Effect),
}

pub fn action_intent(action: &Action) -> PageIntent {
    match &action.command {
        ActionCommand::Copy { content } => PageIntent::Effect(Effect::Copy {
            content: content.clone(),
        }),
        ActionCommand::Open { url, application } => PageIntent::Effect(Effect::Open {
            url: url.clone(),
            application: application.clone(),
        }),
        ActionCommand::Push { script, params } => PageIntent::Push {
            extension: action.extension.clone(),
            script: script.clone(),
            params: params.clone(),
        },
        ActionCommand::Reload { params } => PageIntent::Reload(params.clone()),
        ActionCommand::Exec { command, silent } => PageIntent::Effect(Effect::Exec {
            command: command.clone(),
            extension: action.extension.clone(),
            silent: *silent,
        }),
        ActionCommand::Exit => PageIntent::Effect(Effect::Exit),
    }
}

/// Why the launcher is leaving its event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    Interrupted,
    Popped,
    Copied,
    Opened,
    Exit,
    /// Runs after the terminal is restored; the launcher exits with the
    /// command's status.
    Exec {
        invocation: Invocation,
        silent: bool,
    },
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Interrupted => "interrupted",
            ExitReason::Popped => "popped",
            ExitReason::Copied => "copied",
            ExitReason::Opened => "opened",
            ExitReason::Exit => "exit",
            ExitReason::Exec { .. } => "exec",
        }
    }
}

/// Work the stack hands to the driver. The stack itself never spawns
/// anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Invoke(InvokeRequest),
    RunInteractive(InteractiveRequest),
    Copy(String),
    Open {
        url: String,
        application: Option<String>,
    },
    Quit(ExitReason),
}

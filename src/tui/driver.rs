use super::intent::{Command, EffectKind, ExitReason, InteractiveRequest, InvokeRequest, Msg};
use super::stack::PageStack;
use super::viewport::{PageSize, ViewportOptions, BORDER_SIZE};
use crate::runner::{check_status, run_captured, run_interactive};
use crate::services::Services;
use crate::shared::Logger;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::{Terminal, TerminalOptions, Viewport};
use std::collections::VecDeque;
use std::io::{self, Stderr};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const UI_POLL_INTERVAL: Duration = Duration::from_millis(60);

type StderrTerminal = Terminal<CrosstermBackend<Stderr>>;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to {action}: {source}")]
    Terminal {
        action: &'static str,
        #[source]
        source: io::Error,
    },
}

fn terminal_error(action: &'static str) -> impl FnOnce(io::Error) -> DriverError {
    move |source| DriverError::Terminal { action, source }
}

/// Where the stack is drawn. Inline mode keeps the shell prompt visible and
/// renders a fixed number of rows below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Alternate,
    Inline(u16),
}

impl Screen {
    pub fn for_options(options: &ViewportOptions) -> Self {
        if options.max_height == 0 {
            Screen::Alternate
        } else {
            Screen::Inline(
                options
                    .max_height
                    .saturating_add(BORDER_SIZE)
                    .saturating_add(options.padding.saturating_mul(2)),
            )
        }
    }
}

/// Outcome of handing one command to the driver.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatched {
    /// A worker is running; its result arrives later as a [`Msg`].
    Background,
    /// Must run on the loop thread with the terminal released.
    Interactive(InteractiveRequest),
    Quit(ExitReason),
}

/// Starts the work behind `command`. Captured invocations and effects run
/// on their own thread and report back through `tx`.
pub fn dispatch<S: Services>(
    command: Command,
    services: &Arc<S>,
    tx: &Sender<Msg>,
    logger: &Logger,
) -> Dispatched {
    match command {
        Command::Invoke(request) => {
            spawn_invocation(request, tx.clone(), logger.clone());
            Dispatched::Background
        }
        Command::RunInteractive(request) => Dispatched::Interactive(request),
        Command::Copy(content) => {
            logger.info("effect.copy", &format!("bytes={}", content.len()));
            let services = Arc::clone(services);
            let tx = tx.clone();
            thread::spawn(move || {
                let result = services.copy(&content).map_err(|err| err.to_string());
                let _ = tx.send(Msg::EffectFinished {
                    effect: EffectKind::Copy,
                    result,
                });
            });
            Dispatched::Background
        }
        Command::Open { url, application } => {
            logger.info(
                "effect.open",
                &format!(
                    "target={url} application={}",
                    application.as_deref().unwrap_or("default")
                ),
            );
            let services = Arc::clone(services);
            let tx = tx.clone();
            thread::spawn(move || {
                let result = services
                    .open(&url, application.as_deref())
                    .map_err(|err| err.to_string());
                let _ = tx.send(Msg::EffectFinished {
                    effect: EffectKind::Open,
                    result,
                });
            });
            Dispatched::Background
        }
        Command::Quit(reason) => Dispatched::Quit(reason),
    }
}

fn spawn_invocation(request: InvokeRequest, tx: Sender<Msg>, logger: Logger) {
    let InvokeRequest {
        container,
        generation,
        invocation,
    } = request;
    logger.info(
        "runner.invoke",
        &format!(
            "container={container} generation={generation} command={}",
            invocation.command_form()
        ),
    );
    thread::spawn(move || {
        let result = run_captured(&invocation).map(|output| output.stdout);
        match &result {
            Ok(stdout) => logger.info(
                "runner.done",
                &format!(
                    "container={container} generation={generation} bytes={}",
                    stdout.len()
                ),
            ),
            Err(err) => logger.error(
                "runner.failed",
                &format!("container={container} generation={generation} error={err}"),
            ),
        }
        let _ = tx.send(Msg::RunFinished {
            container,
            generation,
            result,
        });
    });
}

/// Runs an interactive request to completion on the calling thread.
pub fn run_interactive_request(request: &InteractiveRequest, logger: &Logger) -> Msg {
    logger.info(
        "runner.interactive",
        &format!(
            "container={} command={}",
            request.container,
            request.invocation.command_form()
        ),
    );
    let result = run_interactive(&request.invocation).and_then(check_status);
    Msg::InteractiveFinished {
        container: request.container,
        result,
    }
}

pub fn terminal_size() -> Result<PageSize, DriverError> {
    let (width, height) = crossterm::terminal::size().map_err(terminal_error("read terminal size"))?;
    Ok(PageSize::new(width, height))
}

/// Drives `stack` until a quit command, starting with `initial`.
pub fn run_tui<S: Services>(
    stack: &mut PageStack<'_>,
    initial: Vec<Command>,
    services: Arc<S>,
    logger: &Logger,
    screen: Screen,
) -> Result<ExitReason, DriverError> {
    let mut terminal = setup_terminal(screen)?;
    let result = run_event_loop(&mut terminal, stack, initial, &services, logger, screen);
    let teardown = teardown_terminal(&mut terminal, screen);
    let reason = result?;
    teardown?;
    Ok(reason)
}

fn run_event_loop<S: Services>(
    terminal: &mut StderrTerminal,
    stack: &mut PageStack<'_>,
    initial: Vec<Command>,
    services: &Arc<S>,
    logger: &Logger,
    screen: Screen,
) -> Result<ExitReason, DriverError> {
    let (tx, rx) = mpsc::channel();
    let mut pending = VecDeque::from(initial);
    loop {
        while let Some(command) = pending.pop_front() {
            match dispatch(command, services, &tx, logger) {
                Dispatched::Background => {}
                Dispatched::Interactive(request) => {
                    suspend_terminal(terminal, screen)?;
                    let msg = run_interactive_request(&request, logger);
                    resume_terminal(terminal, screen)?;
                    pending.extend(stack.update(msg));
                }
                Dispatched::Quit(reason) => return Ok(reason),
            }
        }

        while let Ok(msg) = rx.try_recv() {
            pending.extend(stack.update(msg));
        }
        if !pending.is_empty() {
            continue;
        }

        terminal
            .draw(|frame| stack.render(frame))
            .map_err(terminal_error("render page"))?;

        if !event::poll(UI_POLL_INTERVAL).map_err(terminal_error("poll events"))? {
            continue;
        }
        match event::read().map_err(terminal_error("read event"))? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                pending.extend(stack.update(Msg::Key(key)));
            }
            Event::Resize(width, height) => {
                pending.extend(stack.update(Msg::Resize { width, height }));
            }
            _ => {}
        }
    }
}

fn setup_terminal(screen: Screen) -> Result<StderrTerminal, DriverError> {
    enable_raw_mode().map_err(terminal_error("enable raw mode"))?;
    let mut stderr = io::stderr();
    match screen {
        Screen::Alternate => execute!(stderr, EnterAlternateScreen, cursor::Hide)
            .map_err(terminal_error("enter alternate screen"))?,
        Screen::Inline(_) => execute!(stderr, cursor::Hide).map_err(terminal_error("hide cursor"))?,
    }
    let backend = CrosstermBackend::new(stderr);
    let viewport = match screen {
        Screen::Alternate => Viewport::Fullscreen,
        Screen::Inline(height) => Viewport::Inline(height),
    };
    Terminal::with_options(backend, TerminalOptions { viewport })
        .map_err(terminal_error("initialize terminal"))
}

fn teardown_terminal(terminal: &mut StderrTerminal, screen: Screen) -> Result<(), DriverError> {
    disable_raw_mode().map_err(terminal_error("disable raw mode"))?;
    match screen {
        Screen::Alternate => execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)
            .map_err(terminal_error("leave alternate screen"))?,
        Screen::Inline(_) => {
            terminal.clear().map_err(terminal_error("clear inline viewport"))?;
            execute!(terminal.backend_mut(), cursor::Show).map_err(terminal_error("show cursor"))?
        }
    }
    terminal.show_cursor().map_err(terminal_error("restore cursor"))
}

fn suspend_terminal(terminal: &mut StderrTerminal, screen: Screen) -> Result<(), DriverError> {
    teardown_terminal(terminal, screen)
}

fn resume_terminal(terminal: &mut StderrTerminal, screen: Screen) -> Result<(), DriverError> {
    enable_raw_mode().map_err(terminal_error("enable raw mode"))?;
    if screen == Screen::Alternate {
        execute!(terminal.backend_mut(), EnterAlternateScreen)
            .map_err(terminal_error("enter alternate screen"))?;
    }
    execute!(terminal.backend_mut(), cursor::Hide).map_err(terminal_error("hide cursor"))?;
    terminal.clear().map_err(terminal_error("clear terminal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_screen_reserves_border_and_padding() {
        let options = ViewportOptions {
            max_width: 0,
            max_height: 10,
            padding: 1,
        };
        assert_eq!(Screen::for_options(&options), Screen::Inline(14));
        assert_eq!(
            Screen::for_options(&ViewportOptions::default()),
            Screen::Alternate
        );
    }
}

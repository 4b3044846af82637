use std::process::{Command, Stdio};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    #[error("failed to open {target} with {program}: {source}")]
    Open {
        target: String,
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with status {status} while opening {target}")]
    OpenStatus {
        target: String,
        program: String,
        status: i32,
    },
}

/// System integrations the launcher treats as black boxes.
pub trait Services: Send + Sync + 'static {
    fn copy(&self, content: &str) -> Result<(), ServiceError>;
    fn open(&self, target: &str, application: Option<&str>) -> Result<(), ServiceError>;
}

/// How long a Linux copy keeps serving the selection, waiting for a
/// clipboard manager to take it over before the process exits.
pub const CLIPBOARD_HANDOVER: Duration = Duration::from_secs(2);

/// Real clipboard and desktop opener.
#[derive(Debug, Clone, Copy)]
pub struct SystemServices {
    clipboard_handover: Duration,
}

impl Default for SystemServices {
    fn default() -> Self {
        Self {
            clipboard_handover: CLIPBOARD_HANDOVER,
        }
    }
}

impl SystemServices {
    pub fn with_clipboard_handover(clipboard_handover: Duration) -> Self {
        Self { clipboard_handover }
    }

    pub fn clipboard_handover(&self) -> Duration {
        self.clipboard_handover
    }
}

impl Services for SystemServices {
    fn copy(&self, content: &str) -> Result<(), ServiceError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| ServiceError::Clipboard(err.to_string()))?;
        set_clipboard_text(&mut clipboard, content, self.clipboard_handover)
            .map_err(|err| ServiceError::Clipboard(err.to_string()))
    }

    fn open(&self, target: &str, application: Option<&str>) -> Result<(), ServiceError> {
        let (program, args) = open_command(target, application);
        let status = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| ServiceError::Open {
                target: target.to_string(),
                program: program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ServiceError::OpenStatus {
                target: target.to_string(),
                program,
                status: status.code().unwrap_or(-1),
            })
        }
    }
}

/// X11 and Wayland only serve a selection while its owner is alive, so the
/// text is held until a clipboard manager claims it or the deadline passes.
#[cfg(target_os = "linux")]
fn set_clipboard_text(
    clipboard: &mut arboard::Clipboard,
    content: &str,
    handover: Duration,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;
    clipboard
        .set()
        .wait_until(std::time::Instant::now() + handover)
        .text(content.to_string())
}

#[cfg(not(target_os = "linux"))]
fn set_clipboard_text(
    clipboard: &mut arboard::Clipboard,
    content: &str,
    _handover: Duration,
) -> Result<(), arboard::Error> {
    clipboard.set_text(content)
}

/// Program and arguments used to open `target`, optionally with a specific
/// application.
pub fn open_command(target: &str, application: Option<&str>) -> (String, Vec<String>) {
    if cfg!(target_os = "macos") {
        let mut args = Vec::new();
        if let Some(app) = application {
            args.push("-a".to_string());
            args.push(app.to_string());
        }
        args.push(target.to_string());
        return ("open".to_string(), args);
    }
    match application {
        Some(app) => (app.to_string(), vec![target.to_string()]),
        None => ("xdg-open".to_string(), vec![target.to_string()]),
    }
}

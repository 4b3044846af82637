use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// JSON-lines log sink. Cloning is cheap; a disabled logger drops every line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Logger {
    path: Option<PathBuf>,
}

impl Logger {
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn info(&self, event: &str, message: &str) {
        self.log("info", event, message);
    }

    pub fn warn(&self, event: &str, message: &str) {
        self.log("warn", event, message);
    }

    pub fn error(&self, event: &str, message: &str) {
        self.log("error", event, message);
    }

    /// Appends one `{timestamp, level, event, message}` line. Failures are
    /// dropped so logging can never take the UI down.
    pub fn log(&self, level: &str, event: &str, message: &str) {
        let Some(path) = &self.path else {
            return;
        };
        let record = serde_json::json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "level": level,
            "event": event,
            "message": message,
        });
        let opened = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| fs::OpenOptions::new().create(true).append(true).open(path));
        if let Ok(mut file) = opened {
            let _ = writeln!(file, "{record}");
        }
    }
}

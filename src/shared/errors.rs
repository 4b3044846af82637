/// Failures that can surface while producing a page. Every variant except
/// `MissingParameter` is recoverable: the owning page turns into an error
/// page and the rest of the stack stays intact.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("missing parameter `{name}` for script `{script}`")]
    MissingParameter { script: String, name: String },
    #[error("{message}")]
    ScriptExecution {
        exit_code: Option<i32>,
        message: String,
    },
    #[error("invalid script output: {reason}")]
    Protocol { reason: String },
    #[error("unknown page type {0}")]
    UnknownMode(String),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl PageError {
    pub fn script_execution(exit_code: Option<i32>, stderr: &str) -> Self {
        let trimmed = stderr.trim_end();
        let message = if trimmed.trim().is_empty() {
            match exit_code {
                Some(code) => format!("script exited with status {code}"),
                None => "script terminated by signal".to_string(),
            }
        } else {
            trimmed.to_string()
        };
        PageError::ScriptExecution { exit_code, message }
    }

    pub fn protocol(reason: impl Into<String>) -> Self {
        PageError::Protocol {
            reason: reason.into(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PageError::MissingParameter { .. })
    }
}

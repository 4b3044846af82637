#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {variable}: expected a non-negative integer")]
    InvalidNumber { variable: String, value: String },
    #[error("failed to resolve home directory for default {purpose} path")]
    HomeDirectoryUnavailable { purpose: &'static str },
}

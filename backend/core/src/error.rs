use thiserror::Error;

/// Top-level error type for the remocon runtime.
#[derive(Debug, Error)]
pub enum RemoconError {
    #[error("transport call `{method}` failed: {message}")]
    Transport { method: &'static str, message: String },

    #[error("action panicked: {0}")]
    ActionPanicked(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl RemoconError {
    pub fn transport(method: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Transport { method, message: err.to_string() }
    }
}

//! Errors raised while handling the working directory and state file

use thiserror::Error;

use tfbridge_core::plugin::PluginError;

#[derive(Debug, Error)]
pub enum StateError {
    /// Filesystem failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// State file is corrupted or invalid
    #[error("Invalid state file: {0}")]
    InvalidState(String),

    /// Serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StateError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type StateResult<T> = Result<T, StateError>;

impl From<StateError> for PluginError {
    fn from(e: StateError) -> Self {
        match e {
            StateError::Io { context, source } => PluginError::Io { context, source },
            StateError::InvalidState(message) => PluginError::InvalidState(message),
            StateError::Serialization(message) => PluginError::Serialization(message),
        }
    }
}

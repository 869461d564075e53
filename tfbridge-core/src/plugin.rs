//! Plugin - Contract between the plugin host and resource adapters
//!
//! The host hands each call an opaque parameter value together with a
//! [`PluginMeta`] describing where the resource keeps its files and how to
//! log back to the host. Adapters answer with an attribute map or an error.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::resource::Attributes;

/// Errors returned to the host
#[derive(Debug, Error)]
pub enum PluginError {
    /// Host parameters are missing a required key or have the wrong shape
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Type name cannot be split into provider and type
    #[error("Invalid type name: {0}")]
    InvalidTypeName(String),

    /// Filesystem or process spawn failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The engine exited unsuccessfully; `output` is its captured output
    #[error("failed to run {program} {step}: {status}, {output}")]
    Engine {
        program: String,
        step: String,
        status: String,
        output: String,
    },

    /// State file is present but not a valid state document
    #[error("Invalid state file: {0}")]
    InvalidState(String),

    /// No state record matched mode, type and name
    #[error("No {mode} resource {resource_type}.{name} found in state")]
    NotFound {
        mode: String,
        resource_type: String,
        name: String,
    },
}

impl PluginError {
    /// Create an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid parameters error
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type PluginResult<T> = Result<T, PluginError>;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Logging callback provided by the host
pub type HostLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Per-call metadata supplied by the host
#[derive(Clone)]
pub struct PluginMeta {
    state_dir: PathBuf,
    logger: HostLogger,
}

impl PluginMeta {
    /// Create metadata whose log messages go to the `log` facade
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            logger: Arc::new(|message: &str| log::info!(target: "tfbridge::host", "{}", message)),
        }
    }

    /// Replace the host logger
    pub fn with_logger(mut self, logger: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Working directory dedicated to this resource
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Send a message to the host log
    pub fn log(&self, message: &str) {
        (self.logger)(message)
    }
}

impl fmt::Debug for PluginMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginMeta")
            .field("state_dir", &self.state_dir)
            .finish_non_exhaustive()
    }
}

/// Lifecycle of a managed resource
pub trait ResourceHandler: Send + Sync {
    /// Create the resource and return its attributes
    fn create(
        &self,
        parameters: &serde_json::Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<Attributes>>;

    /// Bring the resource in line with `current`
    ///
    /// `previous` holds the parameters of the last successful call.
    fn update(
        &self,
        current: &serde_json::Value,
        previous: &serde_json::Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<Attributes>>;

    /// Destroy the resource and everything stored for it
    fn delete(
        &self,
        parameters: &serde_json::Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<()>>;
}

/// Read-only data source
pub trait DataHandler: Send + Sync {
    /// Read the data source and return its attributes
    fn get(
        &self,
        parameters: &serde_json::Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<Attributes>>;
}

/// Resolves type names to handlers
pub trait PluginCatalog: Send + Sync {
    fn resource(&self, name: &str) -> PluginResult<Box<dyn ResourceHandler>>;

    fn data(&self, name: &str) -> PluginResult<Box<dyn DataHandler>>;
}

impl ResourceHandler for Box<dyn ResourceHandler> {
    fn create(
        &self,
        parameters: &serde_json::Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<Attributes>> {
        (**self).create(parameters, meta)
    }

    fn update(
        &self,
        current: &serde_json::Value,
        previous: &serde_json::Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<Attributes>> {
        (**self).update(current, previous, meta)
    }

    fn delete(
        &self,
        parameters: &serde_json::Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<()>> {
        (**self).delete(parameters, meta)
    }
}

impl DataHandler for Box<dyn DataHandler> {
    fn get(
        &self,
        parameters: &serde_json::Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<Attributes>> {
        (**self).get(parameters, meta)
    }
}

//! Resource - Type names and block kinds understood by the engine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::plugin::{PluginError, PluginResult};

/// Name of the single instance written into every synthesized configuration
pub const INSTANCE_NAME: &str = "main";

/// Generic attribute map exchanged with the host
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Kind of top-level block a type name is used in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Managed resource (`resource` block)
    Resource,
    /// Read-only data source (`data` block)
    Data,
}

impl BlockKind {
    /// Key of the block in the configuration document
    pub fn block_key(&self) -> &'static str {
        match self {
            BlockKind::Resource => "resource",
            BlockKind::Data => "data",
        }
    }

    /// Key of the argument mapping in the host parameters
    pub fn parameter_key(&self) -> &'static str {
        self.block_key()
    }

    /// Mode the engine records in its state file for this kind
    pub fn state_mode(&self) -> &'static str {
        match self {
            BlockKind::Resource => "managed",
            BlockKind::Data => "data",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.block_key())
    }
}

/// Combined type name of the form `<provider>_<rest>` (e.g., "aws_s3_bucket")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    full: String,
    provider_len: usize,
}

impl TypeName {
    /// Parse a type name, inferring the provider from the text before the first `_`
    pub fn parse(name: impl Into<String>) -> PluginResult<Self> {
        let full = name.into();
        match full.find('_') {
            Some(0) => Err(PluginError::InvalidTypeName(format!(
                "`{}` has an empty provider prefix",
                full
            ))),
            Some(idx) => Ok(Self {
                full,
                provider_len: idx,
            }),
            None => Err(PluginError::InvalidTypeName(format!(
                "`{}` is not of the form <provider>_<type>",
                full
            ))),
        }
    }

    /// Provider identifier (e.g., "aws")
    pub fn provider(&self) -> &str {
        &self.full[..self.provider_len]
    }

    /// Full type name, used verbatim as the engine's resource/data type
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

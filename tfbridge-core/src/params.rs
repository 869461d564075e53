//! Validated host parameters
//!
//! Host parameters arrive as an untyped JSON value. They are checked once at
//! the boundary and turned into [`BlockParameters`].

use serde_json::Value;

use crate::plugin::{PluginError, PluginResult};
use crate::resource::{Attributes, BlockKind};

/// Provider configuration and block arguments extracted from host parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BlockParameters {
    /// Provider block, forwarded verbatim
    pub provider: Attributes,
    /// Resource or data-source arguments, forwarded verbatim
    pub arguments: Attributes,
}

impl BlockParameters {
    /// Extract `provider` and the `resource`/`data` mapping for `kind`
    pub fn from_value(kind: BlockKind, value: &Value) -> PluginResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            PluginError::invalid_parameters(format!(
                "expected an object, got {}",
                json_type(value)
            ))
        })?;

        let provider = required_object(object, "provider")?;
        let arguments = required_object(object, kind.parameter_key())?;

        Ok(Self {
            provider,
            arguments,
        })
    }
}

fn required_object(object: &Attributes, key: &str) -> PluginResult<Attributes> {
    match object.get(key) {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(PluginError::invalid_parameters(format!(
            "`{}` must be an object, got {}",
            key,
            json_type(other)
        ))),
        None => Err(PluginError::invalid_parameters(format!(
            "missing required key `{}`",
            key
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

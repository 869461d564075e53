//! Document - Synthesis of the one-resource `main.tf.json`

use serde_json::{Map, Value};

use crate::params::BlockParameters;
use crate::plugin::PluginResult;
use crate::resource::{BlockKind, INSTANCE_NAME, TypeName};

/// File name of the synthesized configuration inside the working directory
pub const CONFIG_FILE: &str = "main.tf.json";

/// Terraform JSON configuration declaring one provider and one instance
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

impl ConfigDocument {
    /// Build `{"provider": {p: P}, kind: {type: {"main": A}}}`
    pub fn new(kind: BlockKind, type_name: &TypeName, params: &BlockParameters) -> Self {
        let mut providers = Map::new();
        providers.insert(
            type_name.provider().to_string(),
            Value::Object(params.provider.clone()),
        );

        let mut instances = Map::new();
        instances.insert(
            INSTANCE_NAME.to_string(),
            Value::Object(params.arguments.clone()),
        );

        let mut types = Map::new();
        types.insert(type_name.as_str().to_string(), Value::Object(instances));

        let mut root = Map::new();
        root.insert("provider".to_string(), Value::Object(providers));
        root.insert(kind.block_key().to_string(), Value::Object(types));

        Self { root }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Serialize with two-space indentation, as written to disk
    pub fn to_pretty_json(&self) -> PluginResult<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

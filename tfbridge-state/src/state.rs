//! Terraform state document and record lookup

use serde::{Deserialize, Serialize};

use tfbridge_core::plugin::PluginError;
use tfbridge_core::resource::Attributes;

/// The parts of `terraform.tfstate` the plugin reads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfState {
    /// State format version
    #[serde(default)]
    pub version: u32,
    /// Terraform version that wrote the state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(default)]
    pub serial: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineage: Option<String>,
    /// All resource and data-source records
    pub resources: Vec<ResourceRecord>,
}

impl TfState {
    /// Find a record by mode, type and name
    ///
    /// The first record matching all three wins. A matching record without
    /// instances counts as a miss.
    pub fn find(&self, mode: &str, resource_type: &str, name: &str) -> Lookup<'_> {
        self.resources
            .iter()
            .find(|r| r.mode == mode && r.resource_type == resource_type && r.name == name)
            .and_then(|r| r.instances.first())
            .map(|i| Lookup::Found(&i.attributes))
            .unwrap_or(Lookup::NotFound)
    }
}

/// A single resource or data-source entry in the state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// "managed" for resources, "data" for data sources
    pub mode: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub instances: Vec<InstanceRecord>,
}

/// One instance of a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_key: Option<serde_json::Value>,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Outcome of a state lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Attributes),
    NotFound,
}

impl<'a> Lookup<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Owned attributes, or `PluginError::NotFound` naming what was searched
    pub fn into_result(
        self,
        mode: &str,
        resource_type: &str,
        name: &str,
    ) -> Result<Attributes, PluginError> {
        match self {
            Lookup::Found(attributes) => Ok(attributes.clone()),
            Lookup::NotFound => Err(PluginError::NotFound {
                mode: mode.to_string(),
                resource_type: resource_type.to_string(),
                name: name.to_string(),
            }),
        }
    }
}

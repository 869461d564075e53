//! Plugin catalog mapping type names to Terraform adapters

use tfbridge_core::config::EngineConfig;
use tfbridge_core::engine::Engine;
use tfbridge_core::plugin::{DataHandler, PluginCatalog, PluginResult, ResourceHandler};
use tfbridge_core::resource::TypeName;

use crate::provider::{TerraformData, TerraformResource};

/// Serves every `<provider>_<type>` name through one shared engine
#[derive(Debug, Clone)]
pub struct TerraformPlugin {
    engine: Engine,
}

impl TerraformPlugin {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Plugin spawning the binary named in `config`
    pub fn from_config(config: EngineConfig) -> Self {
        Self::new(Engine::new(config))
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn terraform_resource(&self, name: &str) -> PluginResult<TerraformResource> {
        Ok(TerraformResource::new(
            TypeName::parse(name)?,
            self.engine.clone(),
        ))
    }

    pub fn terraform_data(&self, name: &str) -> PluginResult<TerraformData> {
        Ok(TerraformData::new(TypeName::parse(name)?, self.engine.clone()))
    }
}

impl PluginCatalog for TerraformPlugin {
    fn resource(&self, name: &str) -> PluginResult<Box<dyn ResourceHandler>> {
        Ok(Box::new(self.terraform_resource(name)?))
    }

    fn data(&self, name: &str) -> PluginResult<Box<dyn DataHandler>> {
        Ok(Box::new(self.terraform_data(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTerraform;
    use serde_json::json;
    use tfbridge_core::job::{self, JobResponse, PluginJob};
    use tfbridge_core::plugin::PluginError;

    #[test]
    fn resolves_type_names() {
        let plugin = TerraformPlugin::new(FakeTerraform::new().engine());

        let resource = plugin.terraform_resource("azurerm_resource_group").unwrap();
        assert_eq!(resource.type_name().provider(), "azurerm");

        let data = plugin.terraform_data("aws_caller_identity").unwrap();
        assert_eq!(data.type_name().as_str(), "aws_caller_identity");

        assert!(matches!(
            plugin.resource("bucket"),
            Err(PluginError::InvalidTypeName(_))
        ));
    }

    #[test]
    fn from_config_uses_configured_binary() {
        let plugin = TerraformPlugin::from_config(EngineConfig::default().with_binary("tofu"));
        assert_eq!(plugin.engine().binary(), std::path::Path::new("tofu"));
    }

    #[tokio::test]
    async fn job_lifecycle_through_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let state_dir = dir.path().join("rg");
        let fake = FakeTerraform::new();
        let plugin = TerraformPlugin::new(fake.engine());

        let create: PluginJob = serde_json::from_value(json!({
            "kind": "resource",
            "operation": "create",
            "name": "azurerm_resource_group",
            "parameters": {
                "provider": {"features": {}},
                "resource": {"name": "rg-demo", "location": "japaneast"}
            },
            "meta": {"state_dir": state_dir}
        }))
        .unwrap();

        match job::execute(&plugin, &create).await {
            JobResponse::Ok { result } => {
                assert_eq!(result["id"], json!("azurerm_resource_group.main"));
                assert_eq!(result["location"], json!("japaneast"));
            }
            JobResponse::Error { error } => panic!("create failed: {}", error),
        }

        let delete: PluginJob = serde_json::from_value(json!({
            "kind": "resource",
            "operation": "delete",
            "name": "azurerm_resource_group",
            "meta": {"state_dir": state_dir}
        }))
        .unwrap();

        assert_eq!(
            job::execute(&plugin, &delete).await,
            JobResponse::Ok {
                result: serde_json::Value::Null
            }
        );
        assert!(!state_dir.exists());
        assert_eq!(fake.steps(), vec!["init", "apply", "destroy"]);
    }

    #[tokio::test]
    async fn data_job_reads_data_record() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = TerraformPlugin::new(FakeTerraform::new().engine());

        let get: PluginJob = serde_json::from_value(json!({
            "kind": "data",
            "operation": "get",
            "name": "aws_region",
            "parameters": {"provider": {"region": "eu-central-1"}, "data": {}},
            "meta": {"state_dir": dir.path()}
        }))
        .unwrap();

        let response = job::execute(&plugin, &get).await;
        assert_eq!(
            response,
            JobResponse::Ok {
                result: json!({"id": "aws_region.main"})
            }
        );
    }
}

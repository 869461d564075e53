//! Terraform resource and data-source adapters
//!
//! Both adapters share one path: validate the host parameters, write a
//! one-instance `main.tf.json` into the working directory, run
//! `terraform init` and `terraform apply`, then read the instance's
//! attributes back out of `terraform.tfstate`.

use serde_json::Value;

use tfbridge_core::document::ConfigDocument;
use tfbridge_core::engine::Engine;
use tfbridge_core::params::BlockParameters;
use tfbridge_core::plugin::{BoxFuture, DataHandler, PluginMeta, PluginResult, ResourceHandler};
use tfbridge_core::resource::{Attributes, BlockKind, INSTANCE_NAME, TypeName};
use tfbridge_state::WorkDir;

/// Apply a single block and return the attributes Terraform recorded for it
pub async fn apply_block(
    engine: &Engine,
    kind: BlockKind,
    type_name: &TypeName,
    parameters: &Value,
    meta: &PluginMeta,
) -> PluginResult<Attributes> {
    let params = BlockParameters::from_value(kind, parameters)?;
    let document = ConfigDocument::new(kind, type_name, &params);

    let workdir = WorkDir::new(meta.state_dir());
    workdir.ensure()?;
    log::debug!("writing {}", workdir.config_path().display());
    if let Err(e) = workdir.write_config(&document) {
        meta.log("Error writing Terraform configuration");
        return Err(e.into());
    }

    engine.apply(workdir.path()).await?;
    meta.log("Terraform apply complete");

    let state = workdir.read_state()?;
    state
        .find(kind.state_mode(), type_name.as_str(), INSTANCE_NAME)
        .into_result(kind.state_mode(), type_name.as_str(), INSTANCE_NAME)
}

/// Managed resource backed by Terraform
#[derive(Debug, Clone)]
pub struct TerraformResource {
    type_name: TypeName,
    engine: Engine,
}

impl TerraformResource {
    pub fn new(type_name: TypeName, engine: Engine) -> Self {
        Self { type_name, engine }
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    async fn create_resource(
        &self,
        parameters: Value,
        meta: PluginMeta,
    ) -> PluginResult<Attributes> {
        apply_block(
            &self.engine,
            BlockKind::Resource,
            &self.type_name,
            &parameters,
            &meta,
        )
        .await
    }

    async fn delete_resource(&self, meta: PluginMeta) -> PluginResult<()> {
        let workdir = WorkDir::new(meta.state_dir());

        // The directory stays in place when destroy fails so the state can be inspected
        self.engine.destroy(workdir.path()).await?;

        workdir.remove()?;
        meta.log("Terraform destroy executed successfully.");
        Ok(())
    }
}

impl ResourceHandler for TerraformResource {
    fn create(
        &self,
        parameters: &Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<Attributes>> {
        let parameters = parameters.clone();
        let meta = meta.clone();
        Box::pin(async move { self.create_resource(parameters, meta).await })
    }

    /// Every update is a full reapply of the current parameters
    fn update(
        &self,
        current: &Value,
        _previous: &Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<Attributes>> {
        self.create(current, meta)
    }

    fn delete(&self, _parameters: &Value, meta: &PluginMeta) -> BoxFuture<'_, PluginResult<()>> {
        let meta = meta.clone();
        Box::pin(async move { self.delete_resource(meta).await })
    }
}

/// Data source backed by Terraform
#[derive(Debug, Clone)]
pub struct TerraformData {
    type_name: TypeName,
    engine: Engine,
}

impl TerraformData {
    pub fn new(type_name: TypeName, engine: Engine) -> Self {
        Self { type_name, engine }
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }
}

impl DataHandler for TerraformData {
    fn get(
        &self,
        parameters: &Value,
        meta: &PluginMeta,
    ) -> BoxFuture<'_, PluginResult<Attributes>> {
        let parameters = parameters.clone();
        let meta = meta.clone();
        Box::pin(async move {
            apply_block(
                &self.engine,
                BlockKind::Data,
                &self.type_name,
                &parameters,
                &meta,
            )
            .await
        })
    }
}

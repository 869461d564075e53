//! Job - One host call encoded as JSON
//!
//! The host runs the plugin once per call, writing a [`PluginJob`] to stdin
//! and reading a [`JobResponse`] from stdout.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::plugin::{PluginCatalog, PluginError, PluginMeta, PluginResult};
use crate::resource::BlockKind;

/// Lifecycle operation requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    Get,
}

/// Metadata part of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMeta {
    /// Working directory owned by this resource
    pub state_dir: PathBuf,
}

/// A single request from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginJob {
    pub kind: BlockKind,
    pub operation: Operation,
    /// Combined type name (e.g., "aws_s3_bucket")
    pub name: String,
    #[serde(default)]
    pub parameters: Value,
    /// Parameters of the previous call, for updates
    #[serde(default)]
    pub previous: Value,
    pub meta: JobMeta,
}

/// Answer written back to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobResponse {
    Ok { result: Value },
    Error { error: String },
}

impl JobResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, JobResponse::Ok { .. })
    }
}

impl From<PluginResult<Value>> for JobResponse {
    fn from(result: PluginResult<Value>) -> Self {
        match result {
            Ok(result) => JobResponse::Ok { result },
            Err(e) => JobResponse::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Run a job against a catalog using the default host logger
pub async fn execute(catalog: &dyn PluginCatalog, job: &PluginJob) -> JobResponse {
    let meta = PluginMeta::new(job.meta.state_dir.clone());
    execute_with_meta(catalog, job, &meta).await
}

/// Run a job against a catalog with caller-supplied metadata
pub async fn execute_with_meta(
    catalog: &dyn PluginCatalog,
    job: &PluginJob,
    meta: &PluginMeta,
) -> JobResponse {
    log::debug!("{} {} {}", job.operation_label(), job.kind, job.name);
    dispatch(catalog, job, meta).await.into()
}

async fn dispatch(
    catalog: &dyn PluginCatalog,
    job: &PluginJob,
    meta: &PluginMeta,
) -> PluginResult<Value> {
    match (job.kind, job.operation) {
        (BlockKind::Resource, Operation::Create) => {
            let handler = catalog.resource(&job.name)?;
            let attributes = handler.create(&job.parameters, meta).await?;
            Ok(Value::Object(attributes))
        }
        (BlockKind::Resource, Operation::Update) => {
            let handler = catalog.resource(&job.name)?;
            let attributes = handler
                .update(&job.parameters, &job.previous, meta)
                .await?;
            Ok(Value::Object(attributes))
        }
        (BlockKind::Resource, Operation::Delete) => {
            let handler = catalog.resource(&job.name)?;
            handler.delete(&job.parameters, meta).await?;
            Ok(Value::Null)
        }
        (BlockKind::Data, Operation::Get) => {
            let handler = catalog.data(&job.name)?;
            let attributes = handler.get(&job.parameters, meta).await?;
            Ok(Value::Object(attributes))
        }
        (kind, _) => Err(PluginError::invalid_parameters(format!(
            "operation `{}` is not supported for {} types",
            job.operation_label(),
            kind
        ))),
    }
}

impl PluginJob {
    fn operation_label(&self) -> &'static str {
        match self.operation {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Get => "get",
        }
    }
}

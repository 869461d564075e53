//! Test doubles: a fake Terraform CLI and a recording host logger

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use tfbridge_core::config::EngineConfig;
use tfbridge_core::engine::{CommandOutput, CommandRunner, Engine};
use tfbridge_core::plugin::PluginMeta;

/// Stands in for the Terraform binary
///
/// `apply` reads `main.tf.json` from the working directory and writes a
/// `terraform.tfstate` holding one record per declared instance, whose
/// attributes are the declared arguments plus an `id` of `<type>.<name>`.
/// `destroy` rewrites the state with no resources.
#[derive(Clone, Default)]
pub struct FakeTerraform {
    calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
    failures: BTreeMap<&'static str, &'static str>,
    fixed_state: Option<Value>,
}

impl FakeTerraform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `step` exit with status 1 and `output`
    pub fn failing(mut self, step: &'static str, output: &'static str) -> Self {
        self.failures.insert(step, output);
        self
    }

    /// Write `state` on apply instead of deriving it from the configuration
    pub fn with_state(mut self, state: Value) -> Self {
        self.fixed_state = Some(state);
        self
    }

    pub fn engine(&self) -> Engine {
        Engine::with_runner(EngineConfig::default(), Arc::new(self.clone()))
    }

    pub fn steps(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.0.clone()).collect()
    }

    pub fn cwds(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().iter().map(|c| c.1.clone()).collect()
    }

    fn state_from_config(cwd: &Path) -> std::io::Result<Value> {
        let content = std::fs::read_to_string(cwd.join("main.tf.json"))?;
        let config: Value = serde_json::from_str(&content)?;

        let mut resources = Vec::new();
        for (block, mode) in [("resource", "managed"), ("data", "data")] {
            let Some(types) = config.get(block).and_then(Value::as_object) else {
                continue;
            };
            for (resource_type, instances) in types {
                let Some(instances) = instances.as_object() else {
                    continue;
                };
                for (name, arguments) in instances {
                    let mut attributes = arguments.as_object().cloned().unwrap_or_default();
                    let id = format!("{}.{}", resource_type, name);
                    attributes.insert("id".to_string(), json!(id));
                    resources.push(json!({
                        "mode": mode,
                        "type": resource_type,
                        "name": name,
                        "instances": [{"schema_version": 0, "attributes": attributes}]
                    }));
                }
            }
        }

        Ok(json!({"version": 4, "serial": 1, "resources": resources}))
    }
}

#[async_trait]
impl CommandRunner for FakeTerraform {
    async fn run(
        &self,
        _program: &Path,
        args: &[&str],
        cwd: &Path,
        _env: &BTreeMap<String, String>,
    ) -> std::io::Result<CommandOutput> {
        let step = args[0];
        self.calls
            .lock()
            .unwrap()
            .push((step.to_string(), cwd.to_path_buf()));

        if let Some(output) = self.failures.get(step) {
            return Ok(CommandOutput {
                success: false,
                code: Some(1),
                output: output.to_string(),
            });
        }

        let state = match step {
            "apply" => Some(match &self.fixed_state {
                Some(state) => state.clone(),
                None => Self::state_from_config(cwd)?,
            }),
            "destroy" => Some(json!({"version": 4, "serial": 2, "resources": []})),
            _ => None,
        };
        if let Some(state) = state {
            std::fs::write(cwd.join("terraform.tfstate"), state.to_string())?;
        }

        Ok(CommandOutput {
            success: true,
            code: Some(0),
            output: format!("{} complete", step),
        })
    }
}

/// Collects messages sent to the host log
#[derive(Clone, Default)]
pub struct HostLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl HostLog {
    pub fn meta(&self, state_dir: &Path) -> PluginMeta {
        let lines = self.lines.clone();
        PluginMeta::new(state_dir).with_logger(move |m| lines.lock().unwrap().push(m.to_string()))
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

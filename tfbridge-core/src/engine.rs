//! Engine - Invocation of the Terraform CLI
//!
//! Every step runs with the resource's working directory as the process CWD.
//! Steps are attempted exactly once; a failing step surfaces the captured
//! output verbatim.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::EngineConfig;
use crate::plugin::{PluginError, PluginResult};

/// A single CLI step with its fixed argument list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStep {
    Init,
    Apply,
    Destroy,
}

impl EngineStep {
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            EngineStep::Init => &["init"],
            EngineStep::Apply => &["apply", "-auto-approve"],
            EngineStep::Destroy => &["destroy", "-auto-approve"],
        }
    }

    pub fn name(&self) -> &'static str {
        self.args()[0]
    }
}

impl fmt::Display for EngineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    /// Captured stdout followed by captured stderr
    pub output: String,
}

impl CommandOutput {
    /// Human-readable exit status
    pub fn status(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs external programs
///
/// The seam where tests substitute a fake engine.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &Path,
        args: &[&str],
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> std::io::Result<CommandOutput>;
}

/// Runs programs as child processes of this one
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[&str],
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> std::io::Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .envs(env)
            .stdin(Stdio::null())
            .output()
            .await?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            output: combined,
        })
    }
}

/// Terraform CLI bound to a binary, an environment and a runner
#[derive(Clone)]
pub struct Engine {
    binary: PathBuf,
    env: BTreeMap<String, String>,
    runner: Arc<dyn CommandRunner>,
}

impl Engine {
    /// Engine that spawns real processes
    pub fn new(config: EngineConfig) -> Self {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    pub fn with_runner(config: EngineConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary: config.binary,
            env: config.env,
            runner,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run one step in `dir`
    pub async fn run(&self, step: EngineStep, dir: &Path) -> PluginResult<CommandOutput> {
        log::debug!(
            "running {} {} in {}",
            self.binary.display(),
            step.args().join(" "),
            dir.display()
        );

        let output = self
            .runner
            .run(&self.binary, step.args(), dir, &self.env)
            .await
            .map_err(|e| {
                PluginError::io(
                    format!("failed to execute {} {}", self.binary.display(), step),
                    e,
                )
            })?;

        if !output.success {
            return Err(PluginError::Engine {
                program: self.binary.display().to_string(),
                step: step.to_string(),
                status: output.status(),
                output: output.output,
            });
        }

        log::info!(
            "{} {} finished in {}",
            self.binary.display(),
            step,
            dir.display()
        );
        Ok(output)
    }

    /// `terraform init`
    pub async fn init(&self, dir: &Path) -> PluginResult<CommandOutput> {
        self.run(EngineStep::Init, dir).await
    }

    /// `terraform init` followed by `terraform apply -auto-approve`
    ///
    /// Init runs on every call; nothing records a previous initialization.
    pub async fn apply(&self, dir: &Path) -> PluginResult<CommandOutput> {
        self.init(dir).await?;
        self.run(EngineStep::Apply, dir).await
    }

    /// `terraform destroy -auto-approve`
    pub async fn destroy(&self, dir: &Path) -> PluginResult<CommandOutput> {
        self.run(EngineStep::Destroy, dir).await
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("binary", &self.binary)
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

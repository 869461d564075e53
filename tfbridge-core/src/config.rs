//! Engine configuration

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the Terraform binary
pub const BINARY_ENV: &str = "TFBRIDGE_TERRAFORM_BIN";

/// Prefix of environment variables forwarded to the engine with the prefix stripped
pub const FORWARD_ENV_PREFIX: &str = "TFBRIDGE_ENV_";

/// How the Terraform CLI is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Binary to execute (looked up on PATH when relative)
    pub binary: PathBuf,
    /// Extra environment for every engine process
    pub env: BTreeMap<String, String>,
}

impl EngineConfig {
    pub const DEFAULT_BINARY: &'static str = "terraform";

    /// Configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_vars_os(std::env::vars_os())
    }

    /// Configuration from an explicit set of variables
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)));
        Self::from_vars_os(vars)
    }

    /// Configuration from variables that need not be valid UTF-8
    ///
    /// Non-UTF-8 names are ignored. The binary path is taken as-is; other
    /// forwarded values must be UTF-8 and are skipped otherwise.
    pub fn from_vars_os(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        let mut config = Self::default();
        for (key, value) in vars {
            let Some(key) = key.to_str() else {
                continue;
            };
            if key == BINARY_ENV {
                if !value.is_empty() {
                    config.binary = PathBuf::from(value);
                }
            } else if let Some(name) = key.strip_prefix(FORWARD_ENV_PREFIX)
                && !name.is_empty()
            {
                match value.into_string() {
                    Ok(value) => {
                        config.env.insert(name.to_string(), value);
                    }
                    Err(_) => log::warn!("skipping {}: value is not valid UTF-8", key),
                }
            }
        }
        config
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(Self::DEFAULT_BINARY),
            env: BTreeMap::new(),
        }
    }
}

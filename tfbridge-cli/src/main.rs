use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use serde_json::Value;

use tfbridge_core::config::{BINARY_ENV, EngineConfig};
use tfbridge_core::document::ConfigDocument;
use tfbridge_core::job::{self, JobResponse, PluginJob};
use tfbridge_core::params::BlockParameters;
use tfbridge_core::plugin::{DataHandler, PluginMeta, ResourceHandler};
use tfbridge_core::resource::{BlockKind, TypeName};
use tfbridge_provider_terraform::TerraformPlugin;

#[derive(Parser)]
#[command(name = "tfbridge")]
#[command(
    about = "Manage cloud resources through Terraform on behalf of a plugin host",
    long_about = None
)]
struct Cli {
    /// Terraform binary to execute
    #[arg(long, global = true, env = BINARY_ENV)]
    terraform_bin: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one host job read as JSON and print the JSON response
    Job {
        /// File holding the job (defaults to stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Create or update a resource
    Apply {
        /// Resource type (e.g., aws_s3_bucket)
        resource_type: String,

        /// JSON file with `provider` and `resource` mappings ("-" for stdin)
        #[arg(long)]
        params: PathBuf,

        /// Working directory for this resource
        #[arg(long)]
        state_dir: PathBuf,
    },
    /// Read a data source
    Read {
        /// Data source type (e.g., aws_ami)
        data_type: String,

        /// JSON file with `provider` and `data` mappings ("-" for stdin)
        #[arg(long)]
        params: PathBuf,

        /// Working directory for this data source
        #[arg(long)]
        state_dir: PathBuf,
    },
    /// Destroy a resource and remove its working directory
    Destroy {
        /// Resource type (e.g., aws_s3_bucket)
        resource_type: String,

        /// Working directory for this resource
        #[arg(long)]
        state_dir: PathBuf,

        /// Skip confirmation prompt (auto-approve)
        #[arg(long)]
        auto_approve: bool,
    },
    /// Print the main.tf.json that would be written, without running Terraform
    Render {
        /// Resource or data source type
        type_name: String,

        /// JSON parameters file ("-" for stdin)
        #[arg(long)]
        params: PathBuf,

        /// Render a data block instead of a resource block
        #[arg(long)]
        data: bool,
    },
    /// Generate shell completion scripts
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let plugin = build_plugin(cli.terraform_bin);

    let result = match cli.command {
        Commands::Job { input } => run_job(&plugin, input.as_deref()).await,
        Commands::Apply {
            resource_type,
            params,
            state_dir,
        } => run_apply(&plugin, &resource_type, &params, &state_dir).await,
        Commands::Read {
            data_type,
            params,
            state_dir,
        } => run_read(&plugin, &data_type, &params, &state_dir).await,
        Commands::Destroy {
            resource_type,
            state_dir,
            auto_approve,
        } => run_destroy(&plugin, &resource_type, &state_dir, auto_approve).await,
        Commands::Render {
            type_name,
            params,
            data,
        } => run_render(&type_name, &params, data),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "tfbridge", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_plugin(terraform_bin: Option<PathBuf>) -> TerraformPlugin {
    let mut config = EngineConfig::from_env();
    if let Some(binary) = terraform_bin {
        config = config.with_binary(binary);
    }
    log::debug!("using terraform binary {}", config.binary.display());
    TerraformPlugin::from_config(config)
}

/// Read a file, or stdin when the path is "-"
fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e)),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(content)
        }
    }
}

fn parse_json(content: &str, source: &str) -> Result<Value, String> {
    serde_json::from_str(content).map_err(|e| format!("Failed to parse {}: {}", source, e))
}

fn load_params(path: &Path) -> Result<Value, String> {
    let content = read_input(Some(path))?;
    parse_json(&content, &path.display().to_string())
}

fn print_json(value: &Value) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

async fn run_job(plugin: &TerraformPlugin, input: Option<&Path>) -> Result<(), String> {
    let content = read_input(input)?;
    let response = respond(plugin, &content).await;
    let encoded = serde_json::to_string(&response).map_err(|e| e.to_string())?;
    println!("{}", encoded);

    match response {
        JobResponse::Ok { .. } => Ok(()),
        JobResponse::Error { error } => Err(error),
    }
}

/// Answer one encoded job; a request that does not decode is answered too
async fn respond(plugin: &TerraformPlugin, content: &str) -> JobResponse {
    match serde_json::from_str::<PluginJob>(content) {
        Ok(job) => job::execute(plugin, &job).await,
        Err(e) => JobResponse::Error {
            error: format!("Failed to parse job: {}", e),
        },
    }
}

async fn run_apply(
    plugin: &TerraformPlugin,
    resource_type: &str,
    params: &Path,
    state_dir: &Path,
) -> Result<(), String> {
    let parameters = load_params(params)?;
    let resource = plugin
        .terraform_resource(resource_type)
        .map_err(|e| e.to_string())?;

    eprintln!("{}", format!("Applying {}...", resource_type).cyan().bold());
    let attributes = resource
        .create(&parameters, &PluginMeta::new(state_dir))
        .await
        .map_err(|e| e.to_string())?;
    eprintln!("  {} {}.main", "✓".green(), resource_type);

    print_json(&Value::Object(attributes))
}

async fn run_read(
    plugin: &TerraformPlugin,
    data_type: &str,
    params: &Path,
    state_dir: &Path,
) -> Result<(), String> {
    let parameters = load_params(params)?;
    let data = plugin.terraform_data(data_type).map_err(|e| e.to_string())?;

    let attributes = data
        .get(&parameters, &PluginMeta::new(state_dir))
        .await
        .map_err(|e| e.to_string())?;

    print_json(&Value::Object(attributes))
}

async fn run_destroy(
    plugin: &TerraformPlugin,
    resource_type: &str,
    state_dir: &Path,
    auto_approve: bool,
) -> Result<(), String> {
    let resource = plugin
        .terraform_resource(resource_type)
        .map_err(|e| e.to_string())?;

    if !state_dir.is_dir() {
        println!("{}", "No working directory, nothing to destroy.".green());
        return Ok(());
    }

    println!("{}", "Destroy Plan:".red().bold());
    println!();
    println!("  {} {}.main", "-".red().bold(), resource_type);
    println!("  {} {}", "working directory:".dimmed(), state_dir.display());
    println!();

    if !auto_approve {
        println!("{}", "Do you really want to destroy this resource?".yellow().bold());
        println!(
            "  {}",
            "This action cannot be undone. Type 'yes' to confirm.".yellow()
        );
        print!("\n  Enter a value: ");
        std::io::Write::flush(&mut std::io::stdout()).map_err(|e| e.to_string())?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .map_err(|e| e.to_string())?;

        if input.trim() != "yes" {
            println!();
            println!("{}", "Destroy cancelled.".yellow());
            return Ok(());
        }
        println!();
    }

    println!("{}", "Destroying resource...".red().bold());
    resource
        .delete(&Value::Null, &PluginMeta::new(state_dir))
        .await
        .map_err(|e| e.to_string())?;
    println!("{}", "Destroy complete!".green().bold());
    Ok(())
}

fn render_document(type_name: &str, parameters: &Value, data: bool) -> Result<String, String> {
    let kind = if data {
        BlockKind::Data
    } else {
        BlockKind::Resource
    };
    let type_name = TypeName::parse(type_name).map_err(|e| e.to_string())?;
    let params = BlockParameters::from_value(kind, parameters).map_err(|e| e.to_string())?;

    ConfigDocument::new(kind, &type_name, &params)
        .to_pretty_json()
        .map_err(|e| e.to_string())
}

fn run_render(type_name: &str, params: &Path, data: bool) -> Result<(), String> {
    let parameters = load_params(params)?;
    println!("{}", render_document(type_name, &parameters, data)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_apply_arguments() {
        let cli = Cli::try_parse_from([
            "tfbridge",
            "--terraform-bin",
            "/usr/local/bin/tofu",
            "apply",
            "aws_s3_bucket",
            "--params",
            "bucket.json",
            "--state-dir",
            "/state/bucket",
        ])
        .unwrap();

        assert_eq!(cli.terraform_bin, Some(PathBuf::from("/usr/local/bin/tofu")));
        match cli.command {
            Commands::Apply {
                resource_type,
                params,
                state_dir,
            } => {
                assert_eq!(resource_type, "aws_s3_bucket");
                assert_eq!(params, PathBuf::from("bucket.json"));
                assert_eq!(state_dir, PathBuf::from("/state/bucket"));
            }
            _ => panic!("Expected apply command"),
        }
    }

    #[test]
    fn render_resource_and_data() {
        let params = json!({
            "provider": {"region": "us-west-2"},
            "resource": {"bucket": "logs"},
            "data": {"bucket": "existing"}
        });

        let rendered: Value =
            serde_json::from_str(&render_document("aws_s3_bucket", &params, false).unwrap())
                .unwrap();
        assert_eq!(rendered["resource"]["aws_s3_bucket"]["main"]["bucket"], json!("logs"));

        let rendered: Value =
            serde_json::from_str(&render_document("aws_s3_bucket", &params, true).unwrap())
                .unwrap();
        assert_eq!(rendered["data"]["aws_s3_bucket"]["main"]["bucket"], json!("existing"));
    }

    #[test]
    fn render_reports_invalid_input() {
        let err = render_document("bucket", &json!({}), false).unwrap_err();
        assert!(err.starts_with("Invalid type name"));

        let err = render_document("aws_s3_bucket", &json!({"provider": {}}), false).unwrap_err();
        assert_eq!(err, "Invalid parameters: missing required key `resource`");
    }

    #[test]
    fn load_params_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"provider": {}, "resource": {"name": "x"}}"#).unwrap();

        let value = load_params(&path).unwrap();
        assert_eq!(value["resource"]["name"], json!("x"));

        std::fs::write(&path, "{").unwrap();
        assert!(load_params(&path).unwrap_err().starts_with("Failed to parse"));
        assert!(load_params(&dir.path().join("missing.json")).is_err());
    }

    #[tokio::test]
    async fn malformed_job_is_answered_with_error_response() {
        let plugin = build_plugin(Some(PathBuf::from("/nonexistent/terraform")));

        let response = respond(&plugin, "{\"kind\": \"resource\"").await;
        let encoded: Value = serde_json::to_value(&response).unwrap();

        assert_eq!(encoded["status"], json!("error"));
        let error = encoded["error"].as_str().unwrap();
        assert!(error.starts_with("Failed to parse job: "), "{}", error);
    }

    #[tokio::test]
    async fn job_with_invalid_type_name_never_reaches_engine() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = build_plugin(Some(PathBuf::from("/nonexistent/terraform")));
        let request = json!({
            "kind": "resource",
            "operation": "create",
            "name": "bucket",
            "parameters": {"provider": {}, "resource": {}},
            "meta": {"state_dir": dir.path().join("bucket")}
        });

        let response = respond(&plugin, &request.to_string()).await;

        match response {
            JobResponse::Error { error } => assert!(error.starts_with("Invalid type name")),
            other => panic!("Expected error response, got {:?}", other),
        }
        assert!(!dir.path().join("bucket").exists());
    }

    #[test]
    fn build_plugin_prefers_flag() {
        let plugin = build_plugin(Some(PathBuf::from("/opt/terraform")));
        assert_eq!(plugin.engine().binary(), Path::new("/opt/terraform"));
    }
}

//! tfbridge State Management
//!
//! This crate owns the per-resource working directory and reads the state file
//! Terraform leaves in it.
//!
//! # Overview
//!
//! - **WorkDir**: explicit handle on the directory holding `main.tf.json` and
//!   `terraform.tfstate`
//! - **TfState**: the subset of the Terraform state document the plugin reads
//! - **Lookup**: result of searching the state for one resource record
//!
//! # Example
//!
//! ```ignore
//! use tfbridge_state::WorkDir;
//!
//! let workdir = WorkDir::new("/var/lib/host/state/bucket");
//! workdir.ensure()?;
//! workdir.write_config(&document)?;
//!
//! // ... terraform init && terraform apply ...
//!
//! let state = workdir.read_state()?;
//! let attributes = state
//!     .find("managed", "aws_s3_bucket", "main")
//!     .into_result("managed", "aws_s3_bucket", "main")?;
//! ```

pub mod error;
pub mod state;
pub mod workdir;

pub use error::{StateError, StateResult};
pub use state::{InstanceRecord, Lookup, ResourceRecord, TfState};
pub use workdir::WorkDir;

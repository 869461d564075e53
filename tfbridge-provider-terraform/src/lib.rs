//! tfbridge Terraform Provider
//!
//! Resource and data-source adapters that delegate to the Terraform CLI.
//!
//! ## Module Structure
//!
//! - `provider` - TerraformResource and TerraformData adapters
//! - `catalog` - TerraformPlugin, resolving type names to adapters

pub mod catalog;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types
pub use catalog::TerraformPlugin;
pub use provider::{TerraformData, TerraformResource};

//! tfbridge Core
//!
//! Core library for a plugin that manages cloud resources by delegating to Terraform.
//! It defines the contract with the plugin host, validates host parameters,
//! synthesizes `main.tf.json` documents and runs the Terraform CLI.

pub mod config;
pub mod document;
pub mod engine;
pub mod job;
pub mod params;
pub mod plugin;
pub mod resource;

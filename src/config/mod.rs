//! Visualization Configuration Module
//!
//! Every geometry constant, mesh size and export default is a field of
//! [`VizConfig`], loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `HDDVIZ_CONFIG` environment variable (path to TOML file)
//! 2. `hddviz.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! An explicit `--config` path on the command line bypasses the search and
//! must load cleanly.
//!
//! The config is passed by reference to whatever needs it; there is no
//! global instance.

pub mod defaults;
pub mod validation;
mod viz_config;

pub use viz_config::*;

//! # xconf
//!
//! Compiles proxy configuration documents into typed runtime module
//! configurations.
//!
//! ## Crates
//!
//! - [`xconf_core`] - Runtime configuration types and default values
//! - [`xconf_config`] - Document model, protocol registries and compiler

pub use xconf_config as config;
pub use xconf_core as core;

pub use xconf_config::{Config, ConfigError, OverrideOptions, load_config, load_configs};
pub use xconf_core::CompiledConfig;

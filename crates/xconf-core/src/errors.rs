//! Error type constants for logging and reporting.
//!
//! These constants provide consistent error classification across all crates.

/// Reading the configuration source failed.
pub const ERROR_IO: &str = "io";
/// The document is not well-formed JSON/YAML/TOML.
pub const ERROR_SYNTAX: &str = "syntax";
/// A name or keyword is not part of the accepted vocabulary.
pub const ERROR_SCHEMA: &str = "schema";
/// Cross-field or value-range check failed.
pub const ERROR_VALIDATION: &str = "validation";
/// A protocol settings payload does not fit its schema.
pub const ERROR_DECODE: &str = "decode";

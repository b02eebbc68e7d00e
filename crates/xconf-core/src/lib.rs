//! Core types and constants shared across xconf crates.
//!
//! This crate provides:
//! - Typed runtime module configurations (the compiler's output)
//! - Default configuration values
//! - Error type constants for logging/reporting
//! - Common project metadata

pub mod app;
pub mod defaults;
pub mod errors;
pub mod handler;
pub mod net;
pub mod proxy;
pub mod transport;

// Re-export commonly used items at crate root
pub use app::{App, AppKind, CompiledConfig};
pub use defaults::*;
pub use errors::*;
pub use handler::{InboundHandlerConfig, OutboundHandlerConfig, ReceiverConfig, SenderConfig};
pub use net::{IpOrDomain, PortList, PortRange};

/// Project name.
pub const PROJECT_NAME: &str = "xconf";
/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

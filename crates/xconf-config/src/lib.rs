//! Configuration document model and compiler.
//!
//! A [`Config`] is the user-facing document. [`Config::build`] folds the
//! deprecated listener fields, overlays transport defaults, compiles every
//! inbound and outbound through the protocol [`Registries`] and assembles
//! the ordered runtime module list.

pub mod allocation;
pub mod apps;
pub mod cli;
pub mod common;
mod compile;
mod defaults;
pub mod error;
pub mod inbound;
mod loader;
mod merge;
pub mod mux;
pub mod outbound;
pub mod protocols;
pub mod registry;
pub mod sniffing;
pub mod transport;

use serde::{Deserialize, Serialize};

pub use error::{ConfigError, ErrorKind, ResultExt};
pub use inbound::InboundDetourConfig;
pub use loader::{load_config, load_configs};
pub use merge::OverrideOptions;
pub use outbound::OutboundDetourConfig;
pub use registry::{Buildable, Registries, Registry};

use apps::{
    ApiConfig, DnsConfig, FakeDnsConfig, LogConfig, MetricsConfig, ObservatoryConfig,
    PolicyConfig, ReverseConfig, RouterConfig, StatsConfig, TunConfig,
};
use transport::TransportConfig;

/// Root configuration document.
///
/// `port`, `inbound`, `outbound`, `inboundDetour` and `outboundDetour` are
/// deprecated and folded into `inbounds`/`outbounds` at build time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub port: u16,
    pub inbound: Option<InboundDetourConfig>,
    pub outbound: Option<OutboundDetourConfig>,
    pub inbound_detour: Option<Vec<InboundDetourConfig>>,
    pub outbound_detour: Option<Vec<OutboundDetourConfig>>,

    pub log: Option<LogConfig>,
    pub routing: Option<RouterConfig>,
    pub dns: Option<DnsConfig>,
    pub inbounds: Vec<InboundDetourConfig>,
    pub outbounds: Vec<OutboundDetourConfig>,
    pub transport: Option<TransportConfig>,
    pub policy: Option<PolicyConfig>,
    pub api: Option<ApiConfig>,
    pub metrics: Option<MetricsConfig>,
    pub stats: Option<StatsConfig>,
    pub reverse: Option<ReverseConfig>,
    pub fake_dns: Option<FakeDnsConfig>,
    pub observatory: Option<ObservatoryConfig>,
    pub tun: Option<TunConfig>,
}

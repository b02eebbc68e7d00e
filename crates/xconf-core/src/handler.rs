//! Compiled inbound and outbound handler configurations.

use serde::{Deserialize, Serialize};

use crate::net::{IpOrDomain, PortList};
use crate::proxy::{InboundProxy, OutboundProxy};
use crate::transport::StreamConfig;

/// One listener: transport-level receiver settings plus protocol settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundHandlerConfig {
    pub tag: String,
    pub receiver_settings: ReceiverConfig,
    pub proxy_settings: InboundProxy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// `None` listens on every address.
    pub listen: Option<IpOrDomain>,
    /// `None` for domain-socket listeners.
    pub port_list: Option<PortList>,
    pub allocation_strategy: Option<AllocationStrategy>,
    pub stream_settings: Option<StreamConfig>,
    pub receive_original_destination: bool,
    pub domain_override: Vec<KnownProtocol>,
    pub sniffing_settings: Option<SniffingConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationKind {
    Always,
    Random,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStrategy {
    pub kind: AllocationKind,
    pub concurrency: Option<u32>,
    /// Refresh interval in minutes.
    pub refresh: Option<u32>,
}

/// Legacy domain-override protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnownProtocol {
    Http,
    Tls,
}

/// Sniffed protocols whose detected destination may replace the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SniffProtocol {
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "tls")]
    Tls,
    #[serde(rename = "quic")]
    Quic,
    #[serde(rename = "fakedns")]
    FakeDns,
    #[serde(rename = "fakedns+others")]
    FakeDnsOthers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SniffingConfig {
    pub enabled: bool,
    pub destination_override: Vec<SniffProtocol>,
    /// Lower-cased domains exempt from destination override.
    pub domains_excluded: Vec<String>,
    pub metadata_only: bool,
    pub route_only: bool,
}

/// One sender: transport-level sender settings plus protocol settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundHandlerConfig {
    pub tag: String,
    pub sender_settings: SenderConfig,
    pub proxy_settings: OutboundProxy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Local address to send from. Never a domain.
    pub via: Option<IpOrDomain>,
    pub stream_settings: Option<StreamConfig>,
    pub proxy_settings: Option<ChainProxy>,
    pub multiplex_settings: Option<MultiplexingConfig>,
}

/// Route this sender's connection through another outbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProxy {
    pub tag: String,
    pub transport_layer_proxy: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Udp443Policy {
    #[default]
    Reject,
    Allow,
    Skip,
}

/// Multiplexing settings. A negative `concurrency` disables mux entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplexingConfig {
    pub enabled: bool,
    pub concurrency: i32,
    pub xudp_concurrency: i32,
    pub xudp_proxy_udp443: Udp443Policy,
}

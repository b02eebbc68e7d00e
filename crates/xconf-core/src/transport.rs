//! Runtime stream (transport) settings attached to handlers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Transport protocol carrying a handler's connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProtocol {
    #[default]
    Tcp,
    Mkcp,
    WebSocket,
    Http,
    DomainSocket,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityType {
    #[default]
    None,
    Tls,
}

/// Compiled stream settings.
///
/// `transport_settings` holds one entry for every transport kind that was
/// configured, not only the active `protocol`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    pub protocol: TransportProtocol,
    pub security: SecurityType,
    pub tls: Option<TlsConfig>,
    pub transport_settings: Vec<TransportSettings>,
    pub socket_settings: Option<SocketConfig>,
}

impl StreamConfig {
    pub fn dialer_proxy(&self) -> Option<&str> {
        self.socket_settings
            .as_ref()
            .map(|s| s.dialer_proxy.as_str())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportSettings {
    Tcp(TcpSettings),
    Mkcp(KcpSettings),
    WebSocket(WebSocketSettings),
    Http(HttpSettings),
    DomainSocket(DomainSocketSettings),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderType {
    #[default]
    None,
    Http,
    Srtp,
    Utp,
    Wechat,
    Dtls,
    Wireguard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpSettings {
    pub accept_proxy_protocol: bool,
    pub header: HeaderType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KcpSettings {
    pub mtu: u32,
    pub tti: u32,
    pub uplink_capacity: u32,
    pub downlink_capacity: u32,
    pub congestion: bool,
    pub read_buffer_mb: u32,
    pub write_buffer_mb: u32,
    pub header: HeaderType,
    pub seed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSocketSettings {
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub accept_proxy_protocol: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    pub hosts: Vec<String>,
    pub path: String,
    pub method: String,
    pub headers: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSocketSettings {
    pub path: String,
    pub is_abstract: bool,
    pub padding: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    pub server_name: String,
    pub alpn: Vec<String>,
    pub allow_insecure: bool,
    pub fingerprint: String,
    pub certificates: Vec<Certificate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateUsage {
    #[default]
    Encipherment,
    Verify,
    Issue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub certificate_file: String,
    pub key_file: String,
    pub usage: CertificateUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TproxyMode {
    #[default]
    Off,
    Redirect,
    Tproxy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainStrategy {
    #[default]
    AsIs,
    UseIp,
    UseIpv4,
    UseIpv6,
}

/// Socket-level options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketConfig {
    pub mark: u32,
    pub tcp_fast_open: Option<bool>,
    pub tproxy: TproxyMode,
    pub domain_strategy: DomainStrategy,
    /// Tag of the outbound this socket dials through; empty means none.
    pub dialer_proxy: String,
    pub accept_proxy_protocol: bool,
    pub tcp_keep_alive_interval: u32,
}

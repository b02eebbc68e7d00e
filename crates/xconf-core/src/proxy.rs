//! Runtime protocol settings for every supported inbound and outbound protocol.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::net::{IpOrDomain, Network, ServerEndpoint};
use crate::transport::DomainStrategy;

// ============================================================================
// Shared
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
}

/// A server reached with optional username/password credentials (HTTP, SOCKS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthServer {
    pub endpoint: ServerEndpoint,
    pub users: Vec<Account>,
}

/// Where a VLESS/Trojan server forwards connections that fail authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    pub name: String,
    pub alpn: String,
    pub path: String,
    pub dest: String,
    pub xver: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherType {
    #[serde(rename = "aes-128-gcm")]
    Aes128Gcm,
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    #[serde(rename = "chacha20-poly1305")]
    Chacha20Poly1305,
    #[serde(rename = "xchacha20-poly1305")]
    Xchacha20Poly1305,
    #[serde(rename = "none")]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowsocksUser {
    pub cipher: CipherType,
    pub password: String,
    pub email: String,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlessUser {
    pub id: String,
    pub flow: String,
    pub email: String,
    pub level: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VmessSecurity {
    #[default]
    Auto,
    Aes128Gcm,
    Chacha20Poly1305,
    None,
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmessUser {
    pub id: String,
    pub email: String,
    pub level: u32,
    pub security: VmessSecurity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrojanUser {
    pub password: String,
    pub email: String,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtprotoUser {
    pub email: String,
    pub level: u32,
    /// Hex-encoded 16-byte secret.
    pub secret: String,
}

// ============================================================================
// Inbound
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "snake_case")]
pub enum InboundProxy {
    Dokodemo(DokodemoInbound),
    Http(HttpInbound),
    Shadowsocks(ShadowsocksInbound),
    Socks(SocksInbound),
    Vless(VlessInbound),
    Vmess(VmessInbound),
    Trojan(TrojanInbound),
    Mtproto(MtprotoInbound),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DokodemoInbound {
    pub address: Option<IpOrDomain>,
    pub port: u16,
    pub networks: Vec<Network>,
    pub timeout_secs: u32,
    pub follow_redirect: bool,
    pub user_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpInbound {
    pub timeout_secs: u32,
    pub accounts: BTreeMap<String, String>,
    pub allow_transparent: bool,
    pub user_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowsocksInbound {
    pub users: Vec<ShadowsocksUser>,
    pub networks: Vec<Network>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocksAuth {
    NoAuth,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocksInbound {
    pub auth: SocksAuth,
    pub accounts: BTreeMap<String, String>,
    pub udp_enabled: bool,
    pub address: Option<IpOrDomain>,
    pub user_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlessInbound {
    pub clients: Vec<VlessUser>,
    pub fallbacks: Vec<Fallback>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmessInbound {
    pub users: Vec<VmessUser>,
    pub default_level: u32,
    pub detour: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrojanInbound {
    pub users: Vec<TrojanUser>,
    pub fallbacks: Vec<Fallback>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtprotoInbound {
    pub users: Vec<MtprotoUser>,
}

// ============================================================================
// Outbound
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "snake_case")]
pub enum OutboundProxy {
    Blackhole(BlackholeOutbound),
    Loopback(LoopbackOutbound),
    Freedom(FreedomOutbound),
    Http(HttpOutbound),
    Shadowsocks(ShadowsocksOutbound),
    Socks(SocksOutbound),
    Vless(VlessOutbound),
    Vmess(VmessOutbound),
    Trojan(TrojanOutbound),
    Mtproto,
    Dns(DnsOutbound),
    Wireguard(WireguardOutbound),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlackholeResponse {
    #[default]
    None,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackholeOutbound {
    pub response: BlackholeResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopbackOutbound {
    pub inbound_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreedomOutbound {
    pub domain_strategy: DomainStrategy,
    /// Fixed `host:port` every connection is redirected to.
    pub redirect: Option<String>,
    pub user_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpOutbound {
    pub servers: Vec<AuthServer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocksOutbound {
    pub servers: Vec<AuthServer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowsocksServer {
    pub endpoint: ServerEndpoint,
    pub user: ShadowsocksUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowsocksOutbound {
    pub servers: Vec<ShadowsocksServer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlessServer {
    pub endpoint: ServerEndpoint,
    pub users: Vec<VlessUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlessOutbound {
    pub vnext: Vec<VlessServer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmessServer {
    pub endpoint: ServerEndpoint,
    pub users: Vec<VmessUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmessOutbound {
    pub vnext: Vec<VmessServer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrojanServer {
    pub endpoint: ServerEndpoint,
    pub user: TrojanUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrojanOutbound {
    pub servers: Vec<TrojanServer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsOutbound {
    pub network: Option<Network>,
    pub address: Option<IpOrDomain>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireguardPeer {
    pub public_key: String,
    pub pre_shared_key: String,
    pub endpoint: String,
    pub keep_alive: u32,
    pub allowed_ips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireguardOutbound {
    pub secret_key: String,
    pub addresses: Vec<String>,
    pub peers: Vec<WireguardPeer>,
    pub mtu: u32,
    pub workers: u32,
}

//! Protocol settings schemas.
//!
//! Each protocol decodes its `settings` payload into its own document type;
//! [`InboundSettings`] and [`OutboundSettings`] close over every supported
//! protocol so that building runtime settings is an exhaustive match.

use serde::{Deserialize, Serialize};
use xconf_core::proxy::{Account, AuthServer, Fallback, InboundProxy, OutboundProxy};

use crate::common::Address;
use crate::error::ConfigError;
use crate::registry::{Buildable, Registry};

pub mod blackhole;
pub mod dns;
pub mod dokodemo;
pub mod freedom;
pub mod http;
pub mod loopback;
pub mod mtproto;
pub mod shadowsocks;
pub mod socks;
pub mod trojan;
pub mod vless;
pub mod vmess;
pub mod wireguard;

/// Field naming the protocol of an inbound/outbound entry.
pub const PROTOCOL_KEY: &str = "protocol";
/// Field holding the protocol settings payload of an entry.
pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone)]
pub enum InboundSettings {
    Dokodemo(dokodemo::DokodemoConfig),
    Http(http::HttpServerConfig),
    Shadowsocks(shadowsocks::ShadowsocksServerConfig),
    Socks(socks::SocksServerConfig),
    Vless(vless::VlessInboundConfig),
    Vmess(vmess::VmessInboundConfig),
    Trojan(trojan::TrojanServerConfig),
    Mtproto(mtproto::MtprotoServerConfig),
}

impl InboundSettings {
    /// Whether connections keep the destination the kernel redirected them from.
    pub fn receives_original_destination(&self) -> bool {
        match self {
            InboundSettings::Dokodemo(c) => c.follow_redirect,
            _ => false,
        }
    }
}

impl Buildable for InboundSettings {
    type Output = InboundProxy;

    fn build(&self) -> Result<InboundProxy, ConfigError> {
        Ok(match self {
            InboundSettings::Dokodemo(c) => InboundProxy::Dokodemo(c.build()?),
            InboundSettings::Http(c) => InboundProxy::Http(c.build()?),
            InboundSettings::Shadowsocks(c) => InboundProxy::Shadowsocks(c.build()?),
            InboundSettings::Socks(c) => InboundProxy::Socks(c.build()?),
            InboundSettings::Vless(c) => InboundProxy::Vless(c.build()?),
            InboundSettings::Vmess(c) => InboundProxy::Vmess(c.build()?),
            InboundSettings::Trojan(c) => InboundProxy::Trojan(c.build()?),
            InboundSettings::Mtproto(c) => InboundProxy::Mtproto(c.build()?),
        })
    }
}

#[derive(Debug, Clone)]
pub enum OutboundSettings {
    Blackhole(blackhole::BlackholeConfig),
    Loopback(loopback::LoopbackConfig),
    Freedom(freedom::FreedomConfig),
    Http(http::HttpClientConfig),
    Shadowsocks(shadowsocks::ShadowsocksClientConfig),
    Socks(socks::SocksClientConfig),
    Vless(vless::VlessOutboundConfig),
    Vmess(vmess::VmessOutboundConfig),
    Trojan(trojan::TrojanClientConfig),
    Mtproto(mtproto::MtprotoClientConfig),
    Dns(dns::DnsOutboundConfig),
    Wireguard(wireguard::WireguardConfig),
}

impl Buildable for OutboundSettings {
    type Output = OutboundProxy;

    fn build(&self) -> Result<OutboundProxy, ConfigError> {
        Ok(match self {
            OutboundSettings::Blackhole(c) => OutboundProxy::Blackhole(c.build()?),
            OutboundSettings::Loopback(c) => OutboundProxy::Loopback(c.build()?),
            OutboundSettings::Freedom(c) => OutboundProxy::Freedom(c.build()?),
            OutboundSettings::Http(c) => OutboundProxy::Http(c.build()?),
            OutboundSettings::Shadowsocks(c) => OutboundProxy::Shadowsocks(c.build()?),
            OutboundSettings::Socks(c) => OutboundProxy::Socks(c.build()?),
            OutboundSettings::Vless(c) => OutboundProxy::Vless(c.build()?),
            OutboundSettings::Vmess(c) => OutboundProxy::Vmess(c.build()?),
            OutboundSettings::Trojan(c) => OutboundProxy::Trojan(c.build()?),
            OutboundSettings::Mtproto(c) => {
                c.build()?;
                OutboundProxy::Mtproto
            }
            OutboundSettings::Dns(c) => OutboundProxy::Dns(c.build()?),
            OutboundSettings::Wireguard(c) => OutboundProxy::Wireguard(c.build()?),
        })
    }
}

pub(crate) fn inbound_registry() -> Registry<InboundSettings> {
    let mut r = Registry::new("inbound", PROTOCOL_KEY, SETTINGS_KEY);
    r.register("dokodemo-door", |v| {
        serde_json::from_value(v).map(InboundSettings::Dokodemo)
    })
    .register("http", |v| serde_json::from_value(v).map(InboundSettings::Http))
    .register("shadowsocks", |v| {
        serde_json::from_value(v).map(InboundSettings::Shadowsocks)
    })
    .register("socks", |v| serde_json::from_value(v).map(InboundSettings::Socks))
    .register("vless", |v| serde_json::from_value(v).map(InboundSettings::Vless))
    .register("vmess", |v| serde_json::from_value(v).map(InboundSettings::Vmess))
    .register("trojan", |v| serde_json::from_value(v).map(InboundSettings::Trojan))
    .register("mtproto", |v| serde_json::from_value(v).map(InboundSettings::Mtproto));
    r
}

pub(crate) fn outbound_registry() -> Registry<OutboundSettings> {
    let mut r = Registry::new("outbound", PROTOCOL_KEY, SETTINGS_KEY);
    r.register("blackhole", |v| {
        serde_json::from_value(v).map(OutboundSettings::Blackhole)
    })
    .register("loopback", |v| {
        serde_json::from_value(v).map(OutboundSettings::Loopback)
    })
    .register("freedom", |v| serde_json::from_value(v).map(OutboundSettings::Freedom))
    .register("http", |v| serde_json::from_value(v).map(OutboundSettings::Http))
    .register("shadowsocks", |v| {
        serde_json::from_value(v).map(OutboundSettings::Shadowsocks)
    })
    .register("socks", |v| serde_json::from_value(v).map(OutboundSettings::Socks))
    .register("vless", |v| serde_json::from_value(v).map(OutboundSettings::Vless))
    .register("vmess", |v| serde_json::from_value(v).map(OutboundSettings::Vmess))
    .register("trojan", |v| serde_json::from_value(v).map(OutboundSettings::Trojan))
    .register("mtproto", |v| serde_json::from_value(v).map(OutboundSettings::Mtproto))
    .register("dns", |v| serde_json::from_value(v).map(OutboundSettings::Dns))
    .register("wireguard", |v| {
        serde_json::from_value(v).map(OutboundSettings::Wireguard)
    });
    r
}

// ============================================================================
// Shared schema pieces
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub user: String,
    pub pass: String,
}

impl AccountConfig {
    fn build(&self) -> Account {
        Account {
            username: self.user.clone(),
            password: self.pass.clone(),
        }
    }
}

/// A server with optional user/pass accounts (HTTP and SOCKS clients).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthServerConfig {
    pub address: Address,
    pub port: u16,
    #[serde(default)]
    pub users: Vec<AccountConfig>,
}

pub(crate) fn build_auth_servers(
    protocol: &'static str,
    servers: &[AuthServerConfig],
) -> Result<Vec<AuthServer>, ConfigError> {
    if servers.is_empty() {
        return Err(ConfigError::invalid(protocol, "no server configured"));
    }
    servers
        .iter()
        .map(|s| {
            if s.port == 0 {
                return Err(ConfigError::invalid(
                    protocol,
                    format!("server {} has no port", s.address),
                ));
            }
            Ok(AuthServer {
                endpoint: xconf_core::net::ServerEndpoint {
                    address: s.address.build(),
                    port: s.port,
                },
                users: s.users.iter().map(AccountConfig::build).collect(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FallbackDest {
    Port(u16),
    Addr(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub name: String,
    pub alpn: String,
    pub path: String,
    pub dest: Option<FallbackDest>,
    pub xver: u32,
}

pub(crate) fn build_fallbacks(
    protocol: &'static str,
    fallbacks: &[FallbackConfig],
) -> Result<Vec<Fallback>, ConfigError> {
    fallbacks
        .iter()
        .map(|fb| {
            let dest = match &fb.dest {
                Some(FallbackDest::Port(p)) => p.to_string(),
                Some(FallbackDest::Addr(a)) if !a.is_empty() => a.clone(),
                _ => return Err(ConfigError::invalid(protocol, "fallback has no dest")),
            };
            if fb.xver > 2 {
                return Err(ConfigError::invalid(
                    protocol,
                    format!("only PROXY protocol 0, 1, 2 are supported, got {}", fb.xver),
                ));
            }
            if !fb.path.is_empty() && !fb.path.starts_with('/') {
                return Err(ConfigError::invalid(
                    protocol,
                    format!("fallback path must start with \"/\": {}", fb.path),
                ));
            }
            Ok(Fallback {
                name: fb.name.clone(),
                alpn: fb.alpn.clone(),
                path: fb.path.clone(),
                dest,
                xver: fb.xver,
            })
        })
        .collect()
}

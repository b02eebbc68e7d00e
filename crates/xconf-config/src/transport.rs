//! Stream settings, global transport defaults, TLS and socket options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xconf_core::defaults::{KCP_MTU_MAX, KCP_MTU_MIN, KCP_TTI_MAX, KCP_TTI_MIN};
use xconf_core::transport::{
    Certificate, CertificateUsage, DomainSocketSettings, HeaderType, HttpSettings, KcpSettings,
    SecurityType, SocketConfig as RuntimeSocketConfig, StreamConfig as RuntimeStreamConfig,
    TcpSettings, TlsConfig as RuntimeTlsConfig, TproxyMode, TransportProtocol, TransportSettings,
    WebSocketSettings,
};

use crate::common::{StringList, parse_domain_strategy};
use crate::defaults::*;
use crate::error::{ConfigError, ResultExt};

// ============================================================================
// Per-kind blocks
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    #[serde(rename = "type")]
    pub kind: String,
}

impl HeaderConfig {
    fn build(&self, allowed: &[HeaderType]) -> Result<HeaderType, ConfigError> {
        let header = match self.kind.to_ascii_lowercase().as_str() {
            "" | "none" => HeaderType::None,
            "http" => HeaderType::Http,
            "srtp" => HeaderType::Srtp,
            "utp" => HeaderType::Utp,
            "wechat-video" => HeaderType::Wechat,
            "dtls" => HeaderType::Dtls,
            "wireguard" => HeaderType::Wireguard,
            _ => return Err(ConfigError::unknown("header type", &self.kind)),
        };
        if header != HeaderType::None && !allowed.contains(&header) {
            return Err(ConfigError::unknown("header type", &self.kind));
        }
        Ok(header)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TcpConfig {
    pub accept_proxy_protocol: bool,
    pub header: Option<HeaderConfig>,
}

impl TcpConfig {
    pub fn build(&self) -> Result<TcpSettings, ConfigError> {
        let header = match &self.header {
            Some(h) => h.build(&[HeaderType::Http])?,
            None => HeaderType::None,
        };
        Ok(TcpSettings {
            accept_proxy_protocol: self.accept_proxy_protocol,
            header,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KcpConfig {
    #[serde(default = "default_kcp_mtu")]
    pub mtu: u32,
    #[serde(default = "default_kcp_tti")]
    pub tti: u32,
    #[serde(default = "default_kcp_uplink_capacity")]
    pub uplink_capacity: u32,
    #[serde(default = "default_kcp_downlink_capacity")]
    pub downlink_capacity: u32,
    #[serde(default)]
    pub congestion: bool,
    /// Megabytes.
    #[serde(default = "default_kcp_buffer_size")]
    pub read_buffer_size: u32,
    /// Megabytes.
    #[serde(default = "default_kcp_buffer_size")]
    pub write_buffer_size: u32,
    #[serde(default)]
    pub header: Option<HeaderConfig>,
    #[serde(default)]
    pub seed: Option<String>,
}

impl Default for KcpConfig {
    fn default() -> Self {
        Self {
            mtu: default_kcp_mtu(),
            tti: default_kcp_tti(),
            uplink_capacity: default_kcp_uplink_capacity(),
            downlink_capacity: default_kcp_downlink_capacity(),
            congestion: false,
            read_buffer_size: default_kcp_buffer_size(),
            write_buffer_size: default_kcp_buffer_size(),
            header: None,
            seed: None,
        }
    }
}

impl KcpConfig {
    pub fn build(&self) -> Result<KcpSettings, ConfigError> {
        if !(KCP_MTU_MIN..=KCP_MTU_MAX).contains(&self.mtu) {
            return Err(ConfigError::Validation(format!(
                "mKCP MTU must be between {KCP_MTU_MIN} and {KCP_MTU_MAX}, got {}",
                self.mtu
            )));
        }
        if !(KCP_TTI_MIN..=KCP_TTI_MAX).contains(&self.tti) {
            return Err(ConfigError::Validation(format!(
                "mKCP TTI must be between {KCP_TTI_MIN} and {KCP_TTI_MAX}, got {}",
                self.tti
            )));
        }
        let header = match &self.header {
            Some(h) => h.build(&[
                HeaderType::Srtp,
                HeaderType::Utp,
                HeaderType::Wechat,
                HeaderType::Dtls,
                HeaderType::Wireguard,
            ])?,
            None => HeaderType::None,
        };
        Ok(KcpSettings {
            mtu: self.mtu,
            tti: self.tti,
            uplink_capacity: self.uplink_capacity,
            downlink_capacity: self.downlink_capacity,
            congestion: self.congestion,
            read_buffer_mb: self.read_buffer_size,
            write_buffer_mb: self.write_buffer_size,
            header,
            seed: self.seed.clone().filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebSocketConfig {
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub accept_proxy_protocol: bool,
}

impl WebSocketConfig {
    pub fn build(&self) -> WebSocketSettings {
        WebSocketSettings {
            path: self.path.clone(),
            headers: self.headers.clone(),
            accept_proxy_protocol: self.accept_proxy_protocol,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default)]
    pub host: StringList,
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_http_method")]
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, StringList>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: StringList::default(),
            path: String::new(),
            method: default_http_method(),
            headers: BTreeMap::new(),
        }
    }
}

impl HttpConfig {
    pub fn build(&self) -> HttpSettings {
        HttpSettings {
            hosts: self.host.0.clone(),
            path: self.path.clone(),
            method: self.method.clone(),
            headers: self
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.0.clone()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainSocketConfig {
    pub path: String,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub padding: bool,
}

impl DomainSocketConfig {
    pub fn build(&self) -> Result<DomainSocketSettings, ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::Validation("domain socket path is empty".into()));
        }
        Ok(DomainSocketSettings {
            path: self.path.clone(),
            is_abstract: self.is_abstract,
            padding: self.padding,
        })
    }
}

// ============================================================================
// TLS and socket options
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateConfig {
    pub certificate_file: String,
    pub key_file: String,
    pub usage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TlsConfig {
    pub server_name: String,
    pub alpn: StringList,
    pub allow_insecure: bool,
    pub fingerprint: String,
    pub certificates: Vec<CertificateConfig>,
}

impl TlsConfig {
    pub fn build(&self) -> Result<RuntimeTlsConfig, ConfigError> {
        let certificates = self
            .certificates
            .iter()
            .map(|c| {
                let usage = match c.usage.to_ascii_lowercase().as_str() {
                    "" | "encipherment" => CertificateUsage::Encipherment,
                    "verify" => CertificateUsage::Verify,
                    "issue" => CertificateUsage::Issue,
                    _ => return Err(ConfigError::unknown("certificate usage", &c.usage)),
                };
                if c.certificate_file.is_empty() {
                    return Err(ConfigError::Validation(
                        "certificate has no certificateFile".into(),
                    ));
                }
                Ok(Certificate {
                    certificate_file: c.certificate_file.clone(),
                    key_file: c.key_file.clone(),
                    usage,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(RuntimeTlsConfig {
            server_name: self.server_name.clone(),
            alpn: self.alpn.0.clone(),
            allow_insecure: self.allow_insecure,
            fingerprint: self.fingerprint.clone(),
            certificates,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocketConfig {
    pub mark: u32,
    pub tcp_fast_open: Option<bool>,
    pub tproxy: String,
    pub domain_strategy: String,
    pub dialer_proxy: String,
    pub accept_proxy_protocol: bool,
    pub tcp_keep_alive_interval: u32,
}

impl SocketConfig {
    pub fn build(&self) -> Result<RuntimeSocketConfig, ConfigError> {
        let tproxy = match self.tproxy.to_ascii_lowercase().as_str() {
            "" | "off" => TproxyMode::Off,
            "redirect" => TproxyMode::Redirect,
            "tproxy" => TproxyMode::Tproxy,
            _ => return Err(ConfigError::unknown("tproxy mode", &self.tproxy)),
        };
        Ok(RuntimeSocketConfig {
            mark: self.mark,
            tcp_fast_open: self.tcp_fast_open,
            tproxy,
            domain_strategy: parse_domain_strategy(&self.domain_strategy)?,
            dialer_proxy: self.dialer_proxy.clone(),
            accept_proxy_protocol: self.accept_proxy_protocol,
            tcp_keep_alive_interval: self.tcp_keep_alive_interval,
        })
    }
}

// ============================================================================
// Stream settings
// ============================================================================

/// `network` values understood by stream settings.
pub fn parse_transport_protocol(name: &str) -> Result<TransportProtocol, ConfigError> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "" | "tcp" => TransportProtocol::Tcp,
        "kcp" | "mkcp" => TransportProtocol::Mkcp,
        "ws" | "websocket" => TransportProtocol::WebSocket,
        "http" | "h2" => TransportProtocol::Http,
        "ds" | "domainsocket" => TransportProtocol::DomainSocket,
        _ => return Err(ConfigError::unknown("transport protocol", name)),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConfig {
    #[serde(default = "default_network")]
    pub network: String,
    #[serde(default)]
    pub security: String,
    #[serde(default)]
    pub tls_settings: Option<TlsConfig>,
    #[serde(default)]
    pub tcp_settings: Option<TcpConfig>,
    #[serde(default)]
    pub kcp_settings: Option<KcpConfig>,
    #[serde(default)]
    pub ws_settings: Option<WebSocketConfig>,
    #[serde(default)]
    pub http_settings: Option<HttpConfig>,
    #[serde(default)]
    pub ds_settings: Option<DomainSocketConfig>,
    #[serde(default)]
    pub sockopt: Option<SocketConfig>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            security: String::new(),
            tls_settings: None,
            tcp_settings: None,
            kcp_settings: None,
            ws_settings: None,
            http_settings: None,
            ds_settings: None,
            sockopt: None,
        }
    }
}

impl StreamConfig {
    /// Fill every per-kind block left unset from the global transport defaults.
    ///
    /// Blocks that are already present are never touched, so applying the
    /// same defaults again is a no-op.
    pub fn apply_transport(&mut self, defaults: &TransportConfig) {
        if self.tcp_settings.is_none() {
            self.tcp_settings = defaults.tcp_settings.clone();
        }
        if self.kcp_settings.is_none() {
            self.kcp_settings = defaults.kcp_settings.clone();
        }
        if self.ws_settings.is_none() {
            self.ws_settings = defaults.ws_settings.clone();
        }
        if self.http_settings.is_none() {
            self.http_settings = defaults.http_settings.clone();
        }
        if self.ds_settings.is_none() {
            self.ds_settings = defaults.ds_settings.clone();
        }
    }

    pub fn dialer_proxy(&self) -> Option<&str> {
        self.sockopt
            .as_ref()
            .map(|s| s.dialer_proxy.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn build(&self) -> Result<RuntimeStreamConfig, ConfigError> {
        let protocol = parse_transport_protocol(&self.network)?;
        let (security, tls) = match self.security.to_ascii_lowercase().as_str() {
            "" | "none" => (SecurityType::None, None),
            "tls" => {
                let tls = self.tls_settings.clone().unwrap_or_default();
                (SecurityType::Tls, Some(tls.build().context("failed to build TLS config")?))
            }
            _ => return Err(ConfigError::unknown("security type", &self.security)),
        };

        let mut transport_settings = Vec::new();
        if let Some(tcp) = &self.tcp_settings {
            transport_settings.push(TransportSettings::Tcp(
                tcp.build().context("failed to build TCP config")?,
            ));
        }
        if let Some(kcp) = &self.kcp_settings {
            transport_settings.push(TransportSettings::Mkcp(
                kcp.build().context("failed to build mKCP config")?,
            ));
        }
        if let Some(ws) = &self.ws_settings {
            transport_settings.push(TransportSettings::WebSocket(ws.build()));
        }
        if let Some(http) = &self.http_settings {
            transport_settings.push(TransportSettings::Http(http.build()));
        }
        if let Some(ds) = &self.ds_settings {
            transport_settings.push(TransportSettings::DomainSocket(
                ds.build().context("failed to build domain socket config")?,
            ));
        }

        let socket_settings = self
            .sockopt
            .as_ref()
            .map(|s| s.build().context("failed to build sockopt"))
            .transpose()?;

        Ok(RuntimeStreamConfig {
            protocol,
            security,
            tls,
            transport_settings,
            socket_settings,
        })
    }
}

/// Global transport defaults (`transport`), overlaid onto every handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportConfig {
    pub tcp_settings: Option<TcpConfig>,
    pub kcp_settings: Option<KcpConfig>,
    pub ws_settings: Option<WebSocketConfig>,
    pub http_settings: Option<HttpConfig>,
    pub ds_settings: Option<DomainSocketConfig>,
}

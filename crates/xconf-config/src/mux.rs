//! Outbound multiplexing (`mux`).

use serde::{Deserialize, Serialize};
use xconf_core::defaults::DEFAULT_XUDP_PROXY_UDP443;
use xconf_core::handler::{MultiplexingConfig, Udp443Policy};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MuxConfig {
    pub enabled: bool,
    /// Negative disables mux even when `enabled` is set.
    pub concurrency: i16,
    pub xudp_concurrency: i16,
    #[serde(rename = "xudpProxyUDP443")]
    pub xudp_proxy_udp443: String,
}

impl MuxConfig {
    pub fn build(&self) -> Result<MultiplexingConfig, ConfigError> {
        let policy = match self.xudp_proxy_udp443.as_str() {
            "" => DEFAULT_XUDP_PROXY_UDP443,
            other => other,
        };
        let xudp_proxy_udp443 = match policy {
            "reject" => Udp443Policy::Reject,
            "allow" => Udp443Policy::Allow,
            "skip" => Udp443Policy::Skip,
            _ => return Err(ConfigError::InvalidPolicy(self.xudp_proxy_udp443.clone())),
        };
        Ok(MultiplexingConfig {
            enabled: self.enabled,
            concurrency: i32::from(self.concurrency),
            xudp_concurrency: i32::from(self.xudp_concurrency),
            xudp_proxy_udp443,
        })
    }
}

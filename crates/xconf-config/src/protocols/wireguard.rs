//! WireGuard outbound settings.

use serde::{Deserialize, Serialize};
use xconf_core::proxy::{WireguardOutbound, WireguardPeer};

use crate::defaults::default_wireguard_mtu;
use crate::error::ConfigError;

fn default_allowed_ips() -> Vec<String> {
    vec!["0.0.0.0/0".to_string(), "::/0".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireguardPeerConfig {
    pub public_key: String,
    #[serde(default)]
    pub pre_shared_key: String,
    pub endpoint: String,
    #[serde(default)]
    pub keep_alive: u32,
    #[serde(rename = "allowedIPs", default = "default_allowed_ips")]
    pub allowed_ips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireguardConfig {
    #[serde(default)]
    pub secret_key: String,
    #[serde(rename = "address", default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub peers: Vec<WireguardPeerConfig>,
    #[serde(default = "default_wireguard_mtu")]
    pub mtu: u32,
    #[serde(default)]
    pub workers: u32,
}

impl WireguardConfig {
    pub fn build(&self) -> Result<WireguardOutbound, ConfigError> {
        if self.secret_key.is_empty() {
            return Err(ConfigError::invalid("wireguard", "secretKey is required"));
        }
        if self.peers.is_empty() {
            return Err(ConfigError::invalid("wireguard", "at least one peer is required"));
        }
        let peers = self
            .peers
            .iter()
            .map(|p| {
                if p.public_key.is_empty() || p.endpoint.is_empty() {
                    return Err(ConfigError::invalid(
                        "wireguard",
                        "peer needs publicKey and endpoint",
                    ));
                }
                Ok(WireguardPeer {
                    public_key: p.public_key.clone(),
                    pre_shared_key: p.pre_shared_key.clone(),
                    endpoint: p.endpoint.clone(),
                    keep_alive: p.keep_alive,
                    allowed_ips: p.allowed_ips.clone(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(WireguardOutbound {
            secret_key: self.secret_key.clone(),
            addresses: self.addresses.clone(),
            peers,
            mtu: self.mtu,
            workers: self.workers,
        })
    }
}

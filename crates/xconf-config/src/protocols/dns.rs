//! `dns` outbound: intercept and answer DNS queries.

use serde::{Deserialize, Serialize};
use xconf_core::net::Network;
use xconf_core::proxy::DnsOutbound;

use crate::common::Address;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsOutboundConfig {
    pub network: String,
    pub address: Option<Address>,
    pub port: u16,
}

impl DnsOutboundConfig {
    pub fn build(&self) -> Result<DnsOutbound, ConfigError> {
        let network = match self.network.to_ascii_lowercase().as_str() {
            "" => None,
            "tcp" => Some(Network::Tcp),
            "udp" => Some(Network::Udp),
            _ => return Err(ConfigError::unknown("network", &self.network)),
        };
        Ok(DnsOutbound {
            network,
            address: self.address.as_ref().map(Address::build),
            port: (self.port != 0).then_some(self.port),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn overrides_are_optional() {
        let cfg: DnsOutboundConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            cfg.build().unwrap(),
            DnsOutbound { network: None, address: None, port: None }
        );

        let cfg: DnsOutboundConfig = serde_json::from_value(json!({
            "network": "tcp",
            "address": "1.1.1.1",
            "port": 53
        }))
        .unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.network, Some(Network::Tcp));
        assert_eq!(built.port, Some(53));
    }
}

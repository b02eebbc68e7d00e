//! Built-in DNS resolver (`dns`).

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use xconf_core::app::{DnsApp, NameServer, QueryStrategy};

use crate::common::StringList;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NameServerObject {
    pub address: String,
    pub port: u16,
    pub domains: StringList,
    #[serde(rename = "expectIPs")]
    pub expect_ips: StringList,
    pub skip_fallback: bool,
}

/// A name server given as a bare address or as an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameServerConfig {
    Address(String),
    Object(NameServerObject),
}

impl NameServerConfig {
    pub fn build(&self) -> Result<NameServer, ConfigError> {
        let server = match self {
            NameServerConfig::Address(address) => NameServer {
                address: address.clone(),
                port: None,
                domains: Vec::new(),
                expect_ips: Vec::new(),
                skip_fallback: false,
            },
            NameServerConfig::Object(o) => NameServer {
                address: o.address.clone(),
                port: (o.port != 0).then_some(o.port),
                domains: o.domains.0.clone(),
                expect_ips: o.expect_ips.0.clone(),
                skip_fallback: o.skip_fallback,
            },
        };
        if server.address.is_empty() {
            return Err(ConfigError::Validation("DNS server address is empty".into()));
        }
        Ok(server)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DnsConfig {
    pub servers: Vec<NameServerConfig>,
    pub hosts: BTreeMap<String, StringList>,
    pub client_ip: String,
    pub tag: String,
    pub query_strategy: String,
    pub disable_cache: bool,
    pub disable_fallback: bool,
}

impl DnsConfig {
    pub fn build(&self) -> Result<DnsApp, ConfigError> {
        let client_ip = if self.client_ip.is_empty() {
            None
        } else {
            Some(self.client_ip.parse::<IpAddr>().map_err(|_| {
                ConfigError::Validation(format!("invalid client ip: {}", self.client_ip))
            })?)
        };
        let query_strategy = match self.query_strategy.to_ascii_lowercase().as_str() {
            "" | "useip" => QueryStrategy::UseIp,
            "useipv4" | "useip4" => QueryStrategy::UseIpv4,
            "useipv6" | "useip6" => QueryStrategy::UseIpv6,
            _ => return Err(ConfigError::unknown("query strategy", &self.query_strategy)),
        };
        let servers = self
            .servers
            .iter()
            .map(NameServerConfig::build)
            .collect::<Result<_, _>>()?;
        Ok(DnsApp {
            servers,
            hosts: self
                .hosts
                .iter()
                .map(|(k, v)| (k.clone(), v.0.clone()))
                .collect(),
            client_ip,
            tag: self.tag.clone(),
            query_strategy,
            disable_cache: self.disable_cache,
            disable_fallback: self.disable_fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn servers_as_string_or_object() {
        let cfg: DnsConfig = serde_json::from_value(json!({
            "servers": [
                "8.8.8.8",
                {"address": "1.1.1.1", "port": 5353, "domains": ["geosite:google"], "skipFallback": true}
            ],
            "hosts": {"dns.google": "8.8.8.8"},
            "clientIp": "203.0.113.1",
            "queryStrategy": "UseIPv4"
        }))
        .unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.servers.len(), 2);
        assert_eq!(built.servers[0].port, None);
        assert_eq!(built.servers[1].port, Some(5353));
        assert!(built.servers[1].skip_fallback);
        assert_eq!(built.hosts["dns.google"], vec!["8.8.8.8"]);
        assert_eq!(built.query_strategy, QueryStrategy::UseIpv4);
        assert!(built.client_ip.is_some());
    }

    #[test]
    fn invalid_client_ip() {
        let cfg: DnsConfig = serde_json::from_value(json!({"clientIp": "here"})).unwrap();
        assert!(cfg.build().is_err());
    }
}

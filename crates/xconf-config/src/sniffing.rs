//! Traffic sniffing and the legacy `domainOverride` list.

use serde::{Deserialize, Serialize};
use xconf_core::handler::{KnownProtocol, SniffProtocol, SniffingConfig as RuntimeSniffing};

use crate::common::StringList;
use crate::error::ConfigError;

fn parse_sniff_protocol(name: &str) -> Result<SniffProtocol, ConfigError> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "http" => SniffProtocol::Http,
        "tls" | "https" | "ssl" => SniffProtocol::Tls,
        "quic" => SniffProtocol::Quic,
        "fakedns" => SniffProtocol::FakeDns,
        "fakedns+others" => SniffProtocol::FakeDnsOthers,
        _ => return Err(ConfigError::UnknownSniffProtocol(name.to_string())),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SniffingConfig {
    pub enabled: bool,
    pub dest_override: StringList,
    pub domains_excluded: StringList,
    pub metadata_only: bool,
    pub route_only: bool,
}

impl SniffingConfig {
    pub fn build(&self) -> Result<RuntimeSniffing, ConfigError> {
        let destination_override = self
            .dest_override
            .iter()
            .map(parse_sniff_protocol)
            .collect::<Result<_, _>>()?;
        Ok(RuntimeSniffing {
            enabled: self.enabled,
            destination_override,
            domains_excluded: self
                .domains_excluded
                .iter()
                .map(str::to_lowercase)
                .collect(),
            metadata_only: self.metadata_only,
            route_only: self.route_only,
        })
    }
}

/// `http`, or `tls`/`https`/`ssl`.
pub fn parse_domain_override(list: &StringList) -> Result<Vec<KnownProtocol>, ConfigError> {
    list.iter()
        .map(|p| match p.to_ascii_lowercase().as_str() {
            "http" => Ok(KnownProtocol::Http),
            "https" | "tls" | "ssl" => Ok(KnownProtocol::Tls),
            _ => Err(ConfigError::UnknownDomainOverride(p.to_string())),
        })
        .collect()
}

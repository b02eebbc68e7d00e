//! Primitive document types: addresses, port lists, string/network lists.

use std::fmt;
use std::net::IpAddr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use xconf_core::defaults::MAX_PORT;
use xconf_core::net::{IpOrDomain, Network, PortList, PortRange, ServerEndpoint};
use xconf_core::transport::DomainStrategy;

use crate::error::ConfigError;

// ============================================================================
// Address
// ============================================================================

/// An address as written in the document: an IP literal or a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(IpOrDomain);

impl Address {
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let unbracketed = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);
        match unbracketed.parse::<IpAddr>() {
            Ok(ip) => Address(IpOrDomain::Ip(ip)),
            Err(_) => Address(IpOrDomain::Domain(trimmed.to_string())),
        }
    }

    pub fn is_ip(&self) -> bool {
        matches!(self.0, IpOrDomain::Ip(_))
    }

    pub fn domain(&self) -> Option<&str> {
        match &self.0 {
            IpOrDomain::Domain(d) => Some(d),
            IpOrDomain::Ip(_) => None,
        }
    }

    pub fn is_domain(&self) -> bool {
        self.domain().is_some()
    }

    /// A filesystem (`/path`) or abstract (`@name`) domain-socket address.
    pub fn is_domain_socket(&self) -> bool {
        self.domain()
            .is_some_and(|d| d.starts_with('/') || d.starts_with('@'))
    }

    pub fn is_localhost(&self) -> bool {
        self.domain() == Some("localhost")
    }

    pub fn build(&self) -> IpOrDomain {
        self.0.clone()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.trim().is_empty() {
            return Err(de::Error::custom("empty address"));
        }
        Ok(Address::parse(&s))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `address` + `port` pair used by outbound server lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub address: Address,
    pub port: u16,
}

impl EndpointConfig {
    pub(crate) fn build(&self, protocol: &'static str) -> Result<ServerEndpoint, ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::invalid(
                protocol,
                format!("server {} has no port", self.address),
            ));
        }
        Ok(ServerEndpoint {
            address: self.address.build(),
            port: self.port,
        })
    }
}

// ============================================================================
// Port list
// ============================================================================

/// A port specification: `1080`, `"80,443,1000-2000"` or `[80, "1000-1010"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec(PortList);

impl PortSpec {
    pub fn single(port: u16) -> Self {
        PortSpec(PortList {
            ranges: vec![PortRange::single(u32::from(port))],
        })
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        let mut ranges = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            ranges.push(parse_range(part)?);
        }
        if ranges.is_empty() {
            return Err(format!("empty port list: \"{s}\""));
        }
        Ok(PortSpec(PortList { ranges }))
    }

    pub fn ranges(&self) -> &[PortRange] {
        &self.0.ranges
    }

    pub fn capacity(&self) -> u64 {
        self.0.capacity()
    }

    pub fn build(&self) -> PortList {
        self.0.clone()
    }
}

fn parse_port(s: &str) -> Result<u32, String> {
    let port: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid port: \"{s}\""))?;
    check_port(port)
}

fn check_port(port: u32) -> Result<u32, String> {
    if port == 0 || port > MAX_PORT {
        return Err(format!("port out of range: {port}"));
    }
    Ok(port)
}

fn parse_range(s: &str) -> Result<PortRange, String> {
    match s.split_once('-') {
        Some((from, to)) => {
            let from = parse_port(from)?;
            let to = parse_port(to)?;
            if from > to {
                return Err(format!("invalid port range: {s}"));
            }
            Ok(PortRange { from, to })
        }
        None => parse_port(s).map(PortRange::single),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPortItem {
    Number(u32),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPorts {
    Item(RawPortItem),
    List(Vec<RawPortItem>),
}

impl<'de> Deserialize<'de> for PortSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = match RawPorts::deserialize(deserializer)? {
            RawPorts::Item(item) => vec![item],
            RawPorts::List(items) => items,
        };
        let mut ranges = Vec::new();
        for item in items {
            match item {
                RawPortItem::Number(p) => {
                    ranges.push(PortRange::single(check_port(p).map_err(de::Error::custom)?))
                }
                RawPortItem::Text(s) => {
                    ranges.extend(PortSpec::parse(&s).map_err(de::Error::custom)?.0.ranges)
                }
            }
        }
        if ranges.is_empty() {
            return Err(de::Error::custom("empty port list"));
        }
        Ok(PortSpec(PortList { ranges }))
    }
}

impl Serialize for PortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let parts: Vec<String> = self
            .0
            .ranges
            .iter()
            .map(|r| {
                if r.from == r.to {
                    r.from.to_string()
                } else {
                    format!("{}-{}", r.from, r.to)
                }
            })
            .collect();
        serializer.serialize_str(&parts.join(","))
    }
}

// ============================================================================
// String / network lists
// ============================================================================

/// A list given either as an array of strings or as one comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl StringList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for StringList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(s) => StringList(
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            Raw::Many(v) => StringList(v),
        })
    }
}

impl From<Vec<&str>> for StringList {
    fn from(v: Vec<&str>) -> Self {
        StringList(v.into_iter().map(String::from).collect())
    }
}

/// `"tcp"`, `"udp"`, `"tcp,udp"` or `["tcp", "udp"]`.
pub fn parse_networks(list: &StringList) -> Result<Vec<Network>, ConfigError> {
    let mut out = Vec::new();
    for name in list.iter() {
        let network = match name.to_ascii_lowercase().as_str() {
            "tcp" => Network::Tcp,
            "udp" => Network::Udp,
            _ => return Err(ConfigError::unknown("network", name)),
        };
        if !out.contains(&network) {
            out.push(network);
        }
    }
    Ok(out)
}

/// `AsIs`, `UseIP`, `UseIPv4`, `UseIPv6`; case-insensitive, empty means `AsIs`.
pub fn parse_domain_strategy(s: &str) -> Result<DomainStrategy, ConfigError> {
    Ok(match s.to_ascii_lowercase().as_str() {
        "" | "asis" => DomainStrategy::AsIs,
        "useip" => DomainStrategy::UseIp,
        "useipv4" | "useip4" => DomainStrategy::UseIpv4,
        "useipv6" | "useip6" => DomainStrategy::UseIpv6,
        _ => return Err(ConfigError::unknown("domain strategy", s)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_classification() {
        assert!(Address::parse("127.0.0.1").is_ip());
        assert!(Address::parse("[::1]").is_ip());
        assert!(Address::parse("localhost").is_localhost());
        assert!(Address::parse("/run/xray.sock").is_domain_socket());
        assert!(Address::parse("@xray").is_domain_socket());
        let d = Address::parse("example.com");
        assert!(d.is_domain());
        assert!(!d.is_domain_socket());
    }

    #[test]
    fn port_spec_from_number_string_and_array() {
        let p: PortSpec = serde_json::from_value(serde_json::json!(1080)).unwrap();
        assert_eq!(p.ranges(), &[PortRange::single(1080)]);

        let p: PortSpec = serde_json::from_value(serde_json::json!("53, 443,1000-2000")).unwrap();
        assert_eq!(p.ranges().len(), 3);
        assert_eq!(p.capacity(), 1 + 1 + 1001);

        let p: PortSpec = serde_json::from_value(serde_json::json!([80, "8000-8001"])).unwrap();
        assert_eq!(p.capacity(), 3);
    }

    #[test]
    fn port_spec_keeps_overlap() {
        let p = PortSpec::parse("1000-1010,1005").unwrap();
        assert_eq!(p.ranges().len(), 2);
        assert_eq!(p.capacity(), 12);
    }

    #[test]
    fn port_spec_rejects_bad_input() {
        assert!(PortSpec::parse("2000-1000").is_err());
        assert!(PortSpec::parse("70000").is_err());
        assert!(PortSpec::parse("http").is_err());
        assert!(PortSpec::parse(" , ").is_err());
        assert!(serde_json::from_value::<PortSpec>(serde_json::json!(0)).is_err());
    }

    #[test]
    fn port_spec_serializes_compactly() {
        let p = PortSpec::parse("80,1000-2000").unwrap();
        assert_eq!(serde_json::to_value(&p).unwrap(), "80,1000-2000");
    }

    #[test]
    fn string_list_accepts_both_forms() {
        let a: StringList = serde_json::from_value(serde_json::json!("http, tls")).unwrap();
        let b: StringList = serde_json::from_value(serde_json::json!(["http", "tls"])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn networks_are_deduplicated() {
        let list = StringList::from(vec!["tcp", "UDP", "tcp"]);
        assert_eq!(parse_networks(&list).unwrap(), vec![Network::Tcp, Network::Udp]);
        assert!(parse_networks(&StringList::from(vec!["sctp"])).is_err());
    }

    #[test]
    fn domain_strategy_names() {
        assert_eq!(parse_domain_strategy("").unwrap(), DomainStrategy::AsIs);
        assert_eq!(parse_domain_strategy("UseIPv4").unwrap(), DomainStrategy::UseIpv4);
        assert!(parse_domain_strategy("ForceIP").is_err());
    }
}

//! Network primitives shared by runtime module configurations.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// An inclusive port range. A single port has `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub from: u32,
    pub to: u32,
}

impl PortRange {
    pub fn single(port: u32) -> Self {
        Self {
            from: port,
            to: port,
        }
    }

    /// Number of ports covered by this range.
    pub fn len(&self) -> u64 {
        u64::from(self.to.saturating_sub(self.from)) + 1
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Ordered set of port ranges. Overlapping ranges are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortList {
    pub ranges: Vec<PortRange>,
}

impl PortList {
    /// Total number of ports across all ranges.
    pub fn capacity(&self) -> u64 {
        self.ranges.iter().map(PortRange::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl fmt::Display for PortList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for range in &self.ranges {
            write!(f, "{range} ")?;
        }
        Ok(())
    }
}

/// An IP address or a domain name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpOrDomain {
    Ip(IpAddr),
    Domain(String),
}

impl fmt::Display for IpOrDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpOrDomain::Ip(ip) => write!(f, "{ip}"),
            IpOrDomain::Domain(d) => f.write_str(d),
        }
    }
}

/// Host and port of a remote server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEndpoint {
    pub address: IpOrDomain,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Tcp,
    Udp,
}

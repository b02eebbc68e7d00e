//! Fake-DNS address pools (`fakeDns`).

use std::str::FromStr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use xconf_core::app::{FakeDnsApp, FakeDnsPool};

use crate::defaults::{default_fakedns_ip_pool, default_fakedns_pool_size};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FakeDnsPoolConfig {
    #[serde(default = "default_fakedns_ip_pool")]
    pub ip_pool: String,
    #[serde(default = "default_fakedns_pool_size")]
    pub pool_size: u64,
}

/// Number of addresses in `cidr`, saturating at `u64::MAX`.
fn cidr_capacity(cidr: &str) -> Result<u64, ConfigError> {
    let net = IpNet::from_str(cidr)
        .map_err(|_| ConfigError::Validation(format!("invalid fake DNS ip pool: {cidr}")))?;
    let host_bits = net.max_prefix_len() - net.prefix_len();
    Ok(if host_bits >= 64 {
        u64::MAX
    } else {
        1u64 << host_bits
    })
}

impl FakeDnsPoolConfig {
    pub fn build(&self) -> Result<FakeDnsPool, ConfigError> {
        let capacity = cidr_capacity(&self.ip_pool)?;
        if self.pool_size == 0 || self.pool_size > capacity {
            return Err(ConfigError::Validation(format!(
                "fake DNS pool size {} does not fit {}",
                self.pool_size, self.ip_pool
            )));
        }
        Ok(FakeDnsPool {
            ip_pool: self.ip_pool.clone(),
            pool_size: self.pool_size,
        })
    }
}

/// One pool object or an array of pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FakeDnsConfig {
    Single(FakeDnsPoolConfig),
    Multiple(Vec<FakeDnsPoolConfig>),
}

impl FakeDnsConfig {
    pub fn pools(&self) -> &[FakeDnsPoolConfig] {
        match self {
            FakeDnsConfig::Single(pool) => std::slice::from_ref(pool),
            FakeDnsConfig::Multiple(pools) => pools,
        }
    }

    pub fn build(&self) -> Result<FakeDnsApp, ConfigError> {
        if self.pools().is_empty() {
            return Err(ConfigError::Validation("no fake DNS pool configured".into()));
        }
        Ok(FakeDnsApp {
            pools: self
                .pools()
                .iter()
                .map(FakeDnsPoolConfig::build)
                .collect::<Result<_, _>>()?,
        })
    }
}

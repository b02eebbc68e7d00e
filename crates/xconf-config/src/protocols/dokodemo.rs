//! `dokodemo-door`: forward everything to one fixed (or original) destination.

use serde::{Deserialize, Serialize};
use xconf_core::defaults::DEFAULT_DOKODEMO_NETWORK;
use xconf_core::proxy::DokodemoInbound;

use crate::common::{Address, StringList, parse_networks};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DokodemoConfig {
    pub address: Option<Address>,
    pub port: u16,
    pub network: Option<StringList>,
    pub timeout: u32,
    /// Take the destination from the redirected socket instead of `address`.
    pub follow_redirect: bool,
    pub user_level: u32,
}

impl DokodemoConfig {
    pub fn build(&self) -> Result<DokodemoInbound, ConfigError> {
        let networks = match &self.network {
            Some(list) if !list.is_empty() => parse_networks(list)?,
            _ => parse_networks(&StringList::from(vec![DEFAULT_DOKODEMO_NETWORK]))?,
        };
        Ok(DokodemoInbound {
            address: self.address.as_ref().map(Address::build),
            port: self.port,
            networks,
            timeout_secs: self.timeout,
            follow_redirect: self.follow_redirect,
            user_level: self.user_level,
        })
    }
}

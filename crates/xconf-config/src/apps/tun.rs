//! Virtual network device (`tun`).

use serde::{Deserialize, Serialize};
use xconf_core::app::TunApp;

use crate::defaults::{default_tun_mtu, default_tun_name};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TunConfig {
    #[serde(default = "default_tun_name")]
    pub name: String,
    #[serde(default = "default_tun_mtu")]
    pub mtu: u32,
    #[serde(default)]
    pub user_level: u32,
}

impl TunConfig {
    pub fn build(&self) -> Result<TunApp, ConfigError> {
        if self.mtu == 0 {
            return Err(ConfigError::Validation("tun mtu must be > 0".into()));
        }
        Ok(TunApp {
            name: self.name.clone(),
            mtu: self.mtu,
            user_level: self.user_level,
        })
    }
}

//! Per-level and system policies (`policy`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xconf_core::app::{LevelPolicy, PolicyApp, SystemPolicy};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelPolicyConfig {
    pub handshake: Option<u32>,
    pub conn_idle: Option<u32>,
    pub uplink_only: Option<u32>,
    pub downlink_only: Option<u32>,
    pub stats_user_uplink: bool,
    pub stats_user_downlink: bool,
    pub buffer_size: Option<i32>,
}

impl LevelPolicyConfig {
    pub fn build(&self) -> LevelPolicy {
        LevelPolicy {
            handshake_secs: self.handshake,
            conn_idle_secs: self.conn_idle,
            uplink_only_secs: self.uplink_only,
            downlink_only_secs: self.downlink_only,
            stats_user_uplink: self.stats_user_uplink,
            stats_user_downlink: self.stats_user_downlink,
            buffer_size_kb: self.buffer_size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemPolicyConfig {
    pub stats_inbound_uplink: bool,
    pub stats_inbound_downlink: bool,
    pub stats_outbound_uplink: bool,
    pub stats_outbound_downlink: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Keyed by user level, written as a string in JSON.
    pub levels: BTreeMap<String, LevelPolicyConfig>,
    pub system: Option<SystemPolicyConfig>,
}

impl PolicyConfig {
    pub fn build(&self) -> Result<PolicyApp, ConfigError> {
        let mut levels = BTreeMap::new();
        for (key, level) in &self.levels {
            let n: u32 = key
                .parse()
                .map_err(|_| ConfigError::Validation(format!("invalid policy level: {key}")))?;
            levels.insert(n, level.build());
        }
        let system = self
            .system
            .as_ref()
            .map(|s| SystemPolicy {
                stats_inbound_uplink: s.stats_inbound_uplink,
                stats_inbound_downlink: s.stats_inbound_downlink,
                stats_outbound_uplink: s.stats_outbound_uplink,
                stats_outbound_downlink: s.stats_outbound_downlink,
            })
            .unwrap_or_default();
        Ok(PolicyApp { levels, system })
    }
}

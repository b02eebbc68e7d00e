//! `loopback`: re-enter routing as if the connection arrived on an inbound.

use serde::{Deserialize, Serialize};
use xconf_core::proxy::LoopbackOutbound;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoopbackConfig {
    pub inbound_tag: String,
}

impl LoopbackConfig {
    pub fn build(&self) -> Result<LoopbackOutbound, ConfigError> {
        if self.inbound_tag.is_empty() {
            return Err(ConfigError::invalid("loopback", "inboundTag is required"));
        }
        Ok(LoopbackOutbound {
            inbound_tag: self.inbound_tag.clone(),
        })
    }
}

//! VLESS inbound and outbound settings.

use serde::{Deserialize, Serialize};
use xconf_core::proxy::{VlessInbound, VlessOutbound, VlessServer, VlessUser};

use super::{FallbackConfig, build_fallbacks};
use crate::common::EndpointConfig;
use crate::error::ConfigError;

const FLOW_VISION: &str = "xtls-rprx-vision";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VlessUserConfig {
    pub id: String,
    pub flow: String,
    pub email: String,
    pub level: u32,
    /// Outbound side only; must be `none`.
    pub encryption: String,
}

impl VlessUserConfig {
    fn build(&self) -> Result<VlessUser, ConfigError> {
        if self.id.is_empty() {
            return Err(ConfigError::invalid("vless", "user has no id"));
        }
        match self.flow.as_str() {
            "" | FLOW_VISION => {}
            other => {
                return Err(ConfigError::invalid(
                    "vless",
                    format!("unsupported flow \"{other}\""),
                ));
            }
        }
        Ok(VlessUser {
            id: self.id.clone(),
            flow: self.flow.clone(),
            email: self.email.clone(),
            level: self.level,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VlessInboundConfig {
    pub clients: Vec<VlessUserConfig>,
    pub decryption: String,
    pub fallbacks: Vec<FallbackConfig>,
}

impl VlessInboundConfig {
    pub fn build(&self) -> Result<VlessInbound, ConfigError> {
        if self.decryption != "none" {
            return Err(ConfigError::invalid(
                "vless",
                "please add/set \"decryption\":\"none\" to every settings",
            ));
        }
        let clients = self
            .clients
            .iter()
            .map(VlessUserConfig::build)
            .collect::<Result<_, _>>()?;
        Ok(VlessInbound {
            clients,
            fallbacks: build_fallbacks("vless", &self.fallbacks)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VlessServerConfig {
    #[serde(flatten)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub users: Vec<VlessUserConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VlessOutboundConfig {
    pub vnext: Vec<VlessServerConfig>,
}

impl VlessOutboundConfig {
    pub fn build(&self) -> Result<VlessOutbound, ConfigError> {
        if self.vnext.is_empty() {
            return Err(ConfigError::invalid("vless", "0 VLESS server configured"));
        }
        let vnext = self
            .vnext
            .iter()
            .map(|server| {
                if server.users.is_empty() {
                    return Err(ConfigError::invalid(
                        "vless",
                        format!("0 user configured for VLESS server {}", server.endpoint.address),
                    ));
                }
                let users = server
                    .users
                    .iter()
                    .map(|u| {
                        if u.encryption != "none" {
                            return Err(ConfigError::invalid(
                                "vless",
                                "please add/set \"encryption\":\"none\" for every user",
                            ));
                        }
                        u.build()
                    })
                    .collect::<Result<_, _>>()?;
                Ok(VlessServer {
                    endpoint: server.endpoint.build("vless")?,
                    users,
                })
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(VlessOutbound { vnext })
    }
}

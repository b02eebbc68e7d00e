//! VMess inbound and outbound settings.

use serde::{Deserialize, Serialize};
use xconf_core::proxy::{VmessInbound, VmessOutbound, VmessSecurity, VmessServer, VmessUser};

use crate::common::EndpointConfig;
use crate::error::ConfigError;

fn parse_security(s: &str) -> Result<VmessSecurity, ConfigError> {
    Ok(match s.to_ascii_lowercase().as_str() {
        "" | "auto" => VmessSecurity::Auto,
        "aes-128-gcm" => VmessSecurity::Aes128Gcm,
        "chacha20-poly1305" => VmessSecurity::Chacha20Poly1305,
        "none" => VmessSecurity::None,
        "zero" => VmessSecurity::Zero,
        _ => return Err(ConfigError::unknown("vmess security", s)),
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VmessUserConfig {
    pub id: String,
    pub email: String,
    pub level: Option<u32>,
    pub security: String,
}

impl VmessUserConfig {
    fn build(&self, default_level: u32) -> Result<VmessUser, ConfigError> {
        if self.id.is_empty() {
            return Err(ConfigError::invalid("vmess", "user has no id"));
        }
        Ok(VmessUser {
            id: self.id.clone(),
            email: self.email.clone(),
            level: self.level.unwrap_or(default_level),
            security: parse_security(&self.security)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VmessDefaultConfig {
    pub level: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VmessDetourConfig {
    pub to: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VmessInboundConfig {
    pub clients: Vec<VmessUserConfig>,
    #[serde(rename = "default")]
    pub defaults: Option<VmessDefaultConfig>,
    pub detour: Option<VmessDetourConfig>,
}

impl VmessInboundConfig {
    pub fn build(&self) -> Result<VmessInbound, ConfigError> {
        let default_level = self.defaults.as_ref().map_or(0, |d| d.level);
        let users = self
            .clients
            .iter()
            .map(|u| u.build(default_level))
            .collect::<Result<_, _>>()?;
        Ok(VmessInbound {
            users,
            default_level,
            detour: self
                .detour
                .as_ref()
                .map(|d| d.to.clone())
                .filter(|t| !t.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmessServerConfig {
    #[serde(flatten)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub users: Vec<VmessUserConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VmessOutboundConfig {
    pub vnext: Vec<VmessServerConfig>,
}

impl VmessOutboundConfig {
    pub fn build(&self) -> Result<VmessOutbound, ConfigError> {
        if self.vnext.is_empty() {
            return Err(ConfigError::invalid("vmess", "0 VMess receiver configured"));
        }
        let vnext = self
            .vnext
            .iter()
            .map(|server| {
                if server.users.is_empty() {
                    return Err(ConfigError::invalid(
                        "vmess",
                        format!("0 user configured for VMess server {}", server.endpoint.address),
                    ));
                }
                Ok(VmessServer {
                    endpoint: server.endpoint.build("vmess")?,
                    users: server
                        .users
                        .iter()
                        .map(|u| u.build(0))
                        .collect::<Result<_, _>>()?,
                })
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(VmessOutbound { vnext })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn inbound_default_level_and_detour() {
        let cfg: VmessInboundConfig = serde_json::from_value(json!({
            "clients": [{"id": "a"}, {"id": "b", "level": 3}],
            "default": {"level": 1},
            "detour": {"to": "dynamic"}
        }))
        .unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.users[0].level, 1);
        assert_eq!(built.users[1].level, 3);
        assert_eq!(built.detour.as_deref(), Some("dynamic"));
    }

    #[test]
    fn security_names() {
        let cfg: VmessOutboundConfig = serde_json::from_value(json!({
            "vnext": [{
                "address": "1.2.3.4",
                "port": 10086,
                "users": [{"id": "a", "security": "chacha20-poly1305"}]
            }]
        }))
        .unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.vnext[0].users[0].security, VmessSecurity::Chacha20Poly1305);

        let cfg: VmessOutboundConfig = serde_json::from_value(json!({
            "vnext": [{"address": "1.2.3.4", "port": 1, "users": [{"id": "a", "security": "rot13"}]}]
        }))
        .unwrap();
        assert_eq!(cfg.build().unwrap_err().kind(), ErrorKind::Schema);
    }
}

//! Trojan server and client settings.

use serde::{Deserialize, Serialize};
use xconf_core::proxy::{TrojanInbound, TrojanOutbound, TrojanServer, TrojanUser};

use super::{FallbackConfig, build_fallbacks};
use crate::common::EndpointConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrojanUserConfig {
    pub password: String,
    pub email: String,
    pub level: u32,
}

impl TrojanUserConfig {
    fn build(&self) -> Result<TrojanUser, ConfigError> {
        if self.password.is_empty() {
            return Err(ConfigError::invalid("trojan", "password is not specified"));
        }
        Ok(TrojanUser {
            password: self.password.clone(),
            email: self.email.clone(),
            level: self.level,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrojanServerConfig {
    pub clients: Vec<TrojanUserConfig>,
    pub fallbacks: Vec<FallbackConfig>,
}

impl TrojanServerConfig {
    pub fn build(&self) -> Result<TrojanInbound, ConfigError> {
        Ok(TrojanInbound {
            users: self
                .clients
                .iter()
                .map(TrojanUserConfig::build)
                .collect::<Result<_, _>>()?,
            fallbacks: build_fallbacks("trojan", &self.fallbacks)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrojanServerTarget {
    #[serde(flatten)]
    pub endpoint: EndpointConfig,
    #[serde(flatten)]
    pub user: TrojanUserConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrojanClientConfig {
    pub servers: Vec<TrojanServerTarget>,
}

impl TrojanClientConfig {
    pub fn build(&self) -> Result<TrojanOutbound, ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::invalid("trojan", "0 Trojan server configured"));
        }
        let servers = self
            .servers
            .iter()
            .map(|s| {
                Ok(TrojanServer {
                    endpoint: s.endpoint.build("trojan")?,
                    user: s.user.build()?,
                })
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(TrojanOutbound { servers })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn server_users_need_passwords() {
        let cfg: TrojanServerConfig =
            serde_json::from_value(json!({"clients": [{"email": "a@b"}]})).unwrap();
        assert!(cfg.build().is_err());

        let cfg: TrojanServerConfig = serde_json::from_value(json!({
            "clients": [{"password": "pw", "level": 2}],
            "fallbacks": [{"dest": "127.0.0.1:80", "alpn": "http/1.1"}]
        }))
        .unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.users[0].level, 2);
        assert_eq!(built.fallbacks[0].alpn, "http/1.1");
    }

    #[test]
    fn client_flattens_endpoint_and_user() {
        let cfg: TrojanClientConfig = serde_json::from_value(json!({
            "servers": [{"address": "t.example.com", "port": 443, "password": "pw"}]
        }))
        .unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.servers[0].user.password, "pw");
        assert_eq!(built.servers[0].endpoint.port, 443);
    }
}

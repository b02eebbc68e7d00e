//! Shadowsocks (AEAD) server and client settings.

use serde::{Deserialize, Serialize};
use xconf_core::proxy::{
    CipherType, ShadowsocksInbound, ShadowsocksOutbound, ShadowsocksServer, ShadowsocksUser,
};

use crate::common::{EndpointConfig, StringList, parse_networks};
use crate::error::ConfigError;

pub(crate) fn parse_cipher(method: &str) -> Result<CipherType, ConfigError> {
    Ok(match method.to_ascii_lowercase().as_str() {
        "aes-128-gcm" | "aead_aes_128_gcm" => CipherType::Aes128Gcm,
        "aes-256-gcm" | "aead_aes_256_gcm" => CipherType::Aes256Gcm,
        "chacha20-poly1305" | "chacha20-ietf-poly1305" | "aead_chacha20_poly1305" => {
            CipherType::Chacha20Poly1305
        }
        "xchacha20-poly1305" | "xchacha20-ietf-poly1305" | "aead_xchacha20_poly1305" => {
            CipherType::Xchacha20Poly1305
        }
        "none" | "plain" => CipherType::None,
        _ => return Err(ConfigError::unknown("shadowsocks cipher", method)),
    })
}

fn build_user(
    method: &str,
    password: &str,
    email: &str,
    level: u32,
) -> Result<ShadowsocksUser, ConfigError> {
    let cipher = parse_cipher(method)?;
    if password.is_empty() && cipher != CipherType::None {
        return Err(ConfigError::invalid("shadowsocks", "password is not specified"));
    }
    Ok(ShadowsocksUser {
        cipher,
        password: password.to_string(),
        email: email.to_string(),
        level,
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowsocksUserConfig {
    pub method: String,
    pub password: String,
    pub email: String,
    pub level: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowsocksServerConfig {
    pub method: String,
    pub password: String,
    pub email: String,
    pub level: u32,
    pub network: Option<StringList>,
    pub clients: Vec<ShadowsocksUserConfig>,
}

impl ShadowsocksServerConfig {
    pub fn build(&self) -> Result<ShadowsocksInbound, ConfigError> {
        let users = if self.clients.is_empty() {
            vec![build_user(&self.method, &self.password, &self.email, self.level)?]
        } else {
            self.clients
                .iter()
                .map(|c| {
                    // Per-client method falls back to the server-wide one.
                    let method = if c.method.is_empty() { &self.method } else { &c.method };
                    build_user(method, &c.password, &c.email, c.level)
                })
                .collect::<Result<_, _>>()?
        };
        let networks = match &self.network {
            Some(list) if !list.is_empty() => parse_networks(list)?,
            _ => parse_networks(&StringList::from(vec!["tcp"]))?,
        };
        Ok(ShadowsocksInbound { users, networks })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowsocksServerTarget {
    #[serde(flatten)]
    pub endpoint: EndpointConfig,
    pub method: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowsocksClientConfig {
    pub servers: Vec<ShadowsocksServerTarget>,
}

impl ShadowsocksClientConfig {
    pub fn build(&self) -> Result<ShadowsocksOutbound, ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::invalid("shadowsocks", "0 servers configured"));
        }
        let servers = self
            .servers
            .iter()
            .map(|s| {
                Ok(ShadowsocksServer {
                    endpoint: s.endpoint.build("shadowsocks")?,
                    user: build_user(&s.method, &s.password, &s.email, s.level)?,
                })
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(ShadowsocksOutbound { servers })
    }
}

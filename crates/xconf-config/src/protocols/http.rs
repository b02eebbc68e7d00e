//! HTTP proxy server and client settings.

use serde::{Deserialize, Serialize};
use xconf_core::proxy::{HttpInbound, HttpOutbound};

use super::{AccountConfig, AuthServerConfig, build_auth_servers};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpServerConfig {
    pub timeout: u32,
    pub accounts: Vec<AccountConfig>,
    pub allow_transparent: bool,
    pub user_level: u32,
}

impl HttpServerConfig {
    pub fn build(&self) -> Result<HttpInbound, ConfigError> {
        let mut accounts = std::collections::BTreeMap::new();
        for account in &self.accounts {
            if account.user.is_empty() {
                return Err(ConfigError::invalid("http", "account with empty user"));
            }
            accounts.insert(account.user.clone(), account.pass.clone());
        }
        Ok(HttpInbound {
            timeout_secs: self.timeout,
            accounts,
            allow_transparent: self.allow_transparent,
            user_level: self.user_level,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub servers: Vec<AuthServerConfig>,
}

impl HttpClientConfig {
    pub fn build(&self) -> Result<HttpOutbound, ConfigError> {
        Ok(HttpOutbound {
            servers: build_auth_servers("http", &self.servers)?,
        })
    }
}

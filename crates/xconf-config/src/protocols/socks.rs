//! SOCKS server and client settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xconf_core::proxy::{SocksAuth, SocksInbound, SocksOutbound};

use super::{AccountConfig, AuthServerConfig, build_auth_servers};
use crate::common::Address;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocksServerConfig {
    pub auth: String,
    pub accounts: Vec<AccountConfig>,
    pub udp: bool,
    /// Address advertised to clients for UDP ASSOCIATE.
    pub ip: Option<Address>,
    pub user_level: u32,
}

impl SocksServerConfig {
    pub fn build(&self) -> Result<SocksInbound, ConfigError> {
        let auth = match self.auth.to_ascii_lowercase().as_str() {
            "" | "noauth" => SocksAuth::NoAuth,
            "password" => SocksAuth::Password,
            _ => return Err(ConfigError::unknown("socks auth method", &self.auth)),
        };
        let accounts: BTreeMap<String, String> = self
            .accounts
            .iter()
            .map(|a| (a.user.clone(), a.pass.clone()))
            .collect();
        if auth == SocksAuth::Password && accounts.is_empty() {
            return Err(ConfigError::invalid(
                "socks",
                "password auth requires at least one account",
            ));
        }
        Ok(SocksInbound {
            auth,
            accounts,
            udp_enabled: self.udp,
            address: self.ip.as_ref().map(Address::build),
            user_level: self.user_level,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocksClientConfig {
    pub servers: Vec<AuthServerConfig>,
}

impl SocksClientConfig {
    pub fn build(&self) -> Result<SocksOutbound, ConfigError> {
        Ok(SocksOutbound {
            servers: build_auth_servers("socks", &self.servers)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn empty_settings_mean_noauth() {
        let cfg: SocksServerConfig = serde_json::from_value(json!({})).unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.auth, SocksAuth::NoAuth);
        assert!(!built.udp_enabled);
    }

    #[test]
    fn unknown_auth_is_schema_error() {
        let cfg: SocksServerConfig =
            serde_json::from_value(json!({"auth": "kerberos"})).unwrap();
        assert_eq!(cfg.build().unwrap_err().kind(), ErrorKind::Schema);
    }

    #[test]
    fn password_auth_needs_accounts() {
        let cfg: SocksServerConfig =
            serde_json::from_value(json!({"auth": "password"})).unwrap();
        assert_eq!(cfg.build().unwrap_err().kind(), ErrorKind::Validation);

        let cfg: SocksServerConfig = serde_json::from_value(json!({
            "auth": "password",
            "accounts": [{"user": "u", "pass": "p"}],
            "udp": true,
            "ip": "127.0.0.1"
        }))
        .unwrap();
        let built = cfg.build().unwrap();
        assert!(built.udp_enabled);
        assert_eq!(built.accounts.len(), 1);
    }
}

//! MTProto proxy settings.

use serde::{Deserialize, Serialize};
use xconf_core::defaults::MTPROTO_SECRET_HEX_LEN;
use xconf_core::proxy::{MtprotoInbound, MtprotoUser};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MtprotoUserConfig {
    pub email: String,
    pub level: u32,
    pub secret: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MtprotoServerConfig {
    pub users: Vec<MtprotoUserConfig>,
}

impl MtprotoServerConfig {
    pub fn build(&self) -> Result<MtprotoInbound, ConfigError> {
        if self.users.is_empty() {
            return Err(ConfigError::invalid("mtproto", "0 user configured"));
        }
        let users = self
            .users
            .iter()
            .map(|u| {
                let valid = u.secret.len() == MTPROTO_SECRET_HEX_LEN
                    && u.secret.bytes().all(|b| b.is_ascii_hexdigit());
                if !valid {
                    return Err(ConfigError::invalid(
                        "mtproto",
                        format!("invalid secret for user {}", u.email),
                    ));
                }
                Ok(MtprotoUser {
                    email: u.email.clone(),
                    level: u.level,
                    secret: u.secret.to_ascii_lowercase(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(MtprotoInbound { users })
    }
}

/// The client side takes no settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MtprotoClientConfig {}

impl MtprotoClientConfig {
    pub fn build(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

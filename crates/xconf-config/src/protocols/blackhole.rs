//! `blackhole`: drop every connection, optionally answering HTTP 403 first.

use serde::{Deserialize, Serialize};
use xconf_core::proxy::{BlackholeOutbound, BlackholeResponse};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackholeResponseConfig {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackholeConfig {
    pub response: Option<BlackholeResponseConfig>,
}

impl BlackholeConfig {
    pub fn build(&self) -> Result<BlackholeOutbound, ConfigError> {
        let response = match self.response.as_ref().map(|r| r.kind.to_ascii_lowercase()) {
            None => BlackholeResponse::None,
            Some(kind) => match kind.as_str() {
                "" | "none" => BlackholeResponse::None,
                "http" => BlackholeResponse::Http,
                _ => return Err(ConfigError::unknown("blackhole response type", kind)),
            },
        };
        Ok(BlackholeOutbound { response })
    }
}

//! Reverse tunnels (`reverse`).

use serde::{Deserialize, Serialize};
use xconf_core::app::{ReverseApp, ReverseEndpoint};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseEndpointConfig {
    pub tag: String,
    pub domain: String,
}

impl ReverseEndpointConfig {
    fn build(&self, role: &str) -> Result<ReverseEndpoint, ConfigError> {
        if self.tag.is_empty() {
            return Err(ConfigError::Validation(format!("{role} tag is empty")));
        }
        if self.domain.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{role} {} has no domain",
                self.tag
            )));
        }
        Ok(ReverseEndpoint {
            tag: self.tag.clone(),
            domain: self.domain.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseConfig {
    pub bridges: Vec<ReverseEndpointConfig>,
    pub portals: Vec<ReverseEndpointConfig>,
}

impl ReverseConfig {
    pub fn build(&self) -> Result<ReverseApp, ConfigError> {
        Ok(ReverseApp {
            bridges: self
                .bridges
                .iter()
                .map(|b| b.build("bridge"))
                .collect::<Result<_, _>>()?,
            portals: self
                .portals
                .iter()
                .map(|p| p.build("portal"))
                .collect::<Result<_, _>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bridges_and_portals() {
        let cfg: ReverseConfig = serde_json::from_value(json!({
            "bridges": [{"tag": "bridge", "domain": "reverse.example.com"}],
            "portals": [{"tag": "portal", "domain": "reverse.example.com"}]
        }))
        .unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.bridges[0].tag, "bridge");
        assert_eq!(built.portals.len(), 1);
    }

    #[test]
    fn domain_required() {
        let cfg: ReverseConfig =
            serde_json::from_value(json!({"portals": [{"tag": "portal"}]})).unwrap();
        assert!(cfg.build().unwrap_err().to_string().contains("portal portal"));
    }
}

//! `freedom`: connect directly to the requested destination.

use serde::{Deserialize, Serialize};
use xconf_core::proxy::FreedomOutbound;

use crate::common::parse_domain_strategy;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FreedomConfig {
    pub domain_strategy: String,
    pub redirect: String,
    pub user_level: u32,
}

impl FreedomConfig {
    pub fn build(&self) -> Result<FreedomOutbound, ConfigError> {
        let redirect = if self.redirect.is_empty() {
            None
        } else {
            let (_, port) = self.redirect.rsplit_once(':').ok_or_else(|| {
                ConfigError::invalid(
                    "freedom",
                    format!("invalid redirect address: {}", self.redirect),
                )
            })?;
            if port.parse::<u16>().is_err() {
                return Err(ConfigError::invalid(
                    "freedom",
                    format!("invalid redirect port: {port}"),
                ));
            }
            Some(self.redirect.clone())
        };
        Ok(FreedomOutbound {
            domain_strategy: parse_domain_strategy(&self.domain_strategy)?,
            redirect,
            user_level: self.user_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use xconf_core::transport::DomainStrategy;

    use super::*;

    #[test]
    fn empty_settings() {
        let cfg: FreedomConfig = serde_json::from_value(json!({})).unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.domain_strategy, DomainStrategy::AsIs);
        assert!(built.redirect.is_none());
    }

    #[test]
    fn redirect_needs_host_port() {
        let cfg: FreedomConfig = serde_json::from_value(json!({
            "domainStrategy": "UseIP",
            "redirect": "127.0.0.1:3366"
        }))
        .unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.domain_strategy, DomainStrategy::UseIp);
        assert_eq!(built.redirect.as_deref(), Some("127.0.0.1:3366"));

        let cfg: FreedomConfig = serde_json::from_value(json!({"redirect": "nowhere"})).unwrap();
        assert!(cfg.build().is_err());
    }
}

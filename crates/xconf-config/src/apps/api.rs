//! Control API, metrics and stats modules.

use serde::{Deserialize, Serialize};
use xconf_core::app::{ApiApp, ApiService, MetricsApp};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub tag: String,
    pub services: Vec<String>,
}

impl ApiConfig {
    pub fn build(&self) -> Result<ApiApp, ConfigError> {
        if self.tag.is_empty() {
            return Err(ConfigError::Validation("API tag can't be empty".into()));
        }
        let services = self
            .services
            .iter()
            .map(|s| {
                Ok(match s.to_ascii_lowercase().as_str() {
                    "reflectionservice" => ApiService::ReflectionService,
                    "handlerservice" => ApiService::HandlerService,
                    "loggerservice" => ApiService::LoggerService,
                    "statsservice" => ApiService::StatsService,
                    "routingservice" => ApiService::RoutingService,
                    _ => return Err(ConfigError::unknown("API service", s)),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(ApiApp {
            tag: self.tag.clone(),
            services,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub tag: String,
}

impl MetricsConfig {
    pub fn build(&self) -> Result<MetricsApp, ConfigError> {
        if self.tag.is_empty() {
            return Err(ConfigError::Validation("metrics tag can't be empty".into()));
        }
        Ok(MetricsApp {
            tag: self.tag.clone(),
        })
    }
}

/// `stats` carries no settings; its presence enables the module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsConfig {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn api_services() {
        let cfg: ApiConfig = serde_json::from_value(json!({
            "tag": "api",
            "services": ["HandlerService", "StatsService"]
        }))
        .unwrap();
        assert_eq!(
            cfg.build().unwrap().services,
            vec![ApiService::HandlerService, ApiService::StatsService]
        );

        let cfg: ApiConfig =
            serde_json::from_value(json!({"tag": "api", "services": ["ShellService"]})).unwrap();
        assert!(cfg.build().is_err());
    }

    #[test]
    fn tags_are_required() {
        assert!(ApiConfig::default().build().is_err());
        assert!(MetricsConfig::default().build().is_err());
    }
}

//! Outbound health observation (`observatory`).

use serde::{Deserialize, Serialize};
use xconf_core::app::ObservatoryApp;
use xconf_core::defaults::DEFAULT_OBSERVATORY_PROBE_INTERVAL_MS;

use crate::common::StringList;
use crate::defaults::default_probe_url;
use crate::error::ConfigError;

/// Parse a duration such as `30s`, `1m30s` or `500ms` into milliseconds.
fn parse_interval_ms(s: &str) -> Result<u64, ConfigError> {
    let interval = humantime::parse_duration(s.trim())
        .map_err(|e| ConfigError::Validation(format!("invalid probe interval {s}: {e}")))?;
    u64::try_from(interval.as_millis())
        .map_err(|_| ConfigError::Validation(format!("probe interval too large: {s}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservatoryConfig {
    #[serde(default)]
    pub subject_selector: StringList,
    #[serde(rename = "probeURL", default = "default_probe_url")]
    pub probe_url: String,
    #[serde(default)]
    pub probe_interval: String,
}

impl ObservatoryConfig {
    pub fn build(&self) -> Result<ObservatoryApp, ConfigError> {
        let probe_interval_ms = if self.probe_interval.is_empty() {
            DEFAULT_OBSERVATORY_PROBE_INTERVAL_MS
        } else {
            parse_interval_ms(&self.probe_interval)?
        };
        if probe_interval_ms == 0 {
            return Err(ConfigError::Validation("probe interval must be > 0".into()));
        }
        Ok(ObservatoryApp {
            subject_selector: self.subject_selector.0.clone(),
            probe_url: self.probe_url.clone(),
            probe_interval_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use xconf_core::defaults::DEFAULT_OBSERVATORY_PROBE_URL;

    use super::*;

    #[test]
    fn defaults() {
        let cfg: ObservatoryConfig = serde_json::from_value(json!({})).unwrap();
        let built = cfg.build().unwrap();
        assert_eq!(built.probe_url, DEFAULT_OBSERVATORY_PROBE_URL);
        assert_eq!(built.probe_interval_ms, 60_000);
    }

    #[test]
    fn interval_units() {
        assert_eq!(parse_interval_ms("10s").unwrap(), 10_000);
        assert_eq!(parse_interval_ms("5m").unwrap(), 300_000);
        assert_eq!(parse_interval_ms("1h").unwrap(), 3_600_000);
        assert_eq!(parse_interval_ms("500ms").unwrap(), 500);
        assert!(parse_interval_ms("soon").is_err());
    }

    #[test]
    fn compound_intervals() {
        assert_eq!(parse_interval_ms("1m30s").unwrap(), 90_000);
        assert_eq!(parse_interval_ms("2h30m").unwrap(), 9_000_000);

        let cfg: ObservatoryConfig =
            serde_json::from_value(json!({"probeInterval": "500ms"})).unwrap();
        assert_eq!(cfg.build().unwrap().probe_interval_ms, 500);
    }

    #[test]
    fn selector_and_zero_interval() {
        let cfg: ObservatoryConfig = serde_json::from_value(json!({
            "subjectSelector": ["proxy-a", "proxy-b"],
            "probeInterval": "0s"
        }))
        .unwrap();
        assert!(cfg.build().is_err());
    }
}

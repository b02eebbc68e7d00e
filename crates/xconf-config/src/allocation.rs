//! Inbound port allocation (`allocate`).

use serde::{Deserialize, Serialize};
use xconf_core::handler::{AllocationKind, AllocationStrategy};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub strategy: String,
    pub concurrency: Option<u32>,
    /// Minutes.
    pub refresh: Option<u32>,
}

impl AllocationConfig {
    pub fn kind(&self) -> Result<AllocationKind, ConfigError> {
        match self.strategy.to_ascii_lowercase().as_str() {
            "always" => Ok(AllocationKind::Always),
            "random" => Ok(AllocationKind::Random),
            "external" => Ok(AllocationKind::External),
            _ => Err(ConfigError::UnknownStrategy(self.strategy.clone())),
        }
    }

    /// Concurrency that must fit the port capacity, if any.
    pub fn required_concurrency(&self) -> Result<Option<u32>, ConfigError> {
        Ok(match self.kind()? {
            AllocationKind::Random => self.concurrency,
            _ => None,
        })
    }

    pub fn build(&self) -> Result<AllocationStrategy, ConfigError> {
        Ok(AllocationStrategy {
            kind: self.kind()?,
            concurrency: self.concurrency,
            refresh: self.refresh,
        })
    }
}

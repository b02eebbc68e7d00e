//! Inbound listener entries (`inbounds`, `inbound`, `inboundDetour`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use xconf_core::handler::{InboundHandlerConfig, ReceiverConfig};
use xconf_core::net::{IpOrDomain, PortList};

use crate::allocation::AllocationConfig;
use crate::common::{Address, PortSpec, StringList};
use crate::error::{ConfigError, ResultExt};
use crate::protocols::InboundSettings;
use crate::registry::{Buildable, Registry};
use crate::sniffing::{SniffingConfig, parse_domain_override};
use crate::transport::StreamConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InboundDetourConfig {
    pub protocol: String,
    pub port: Option<PortSpec>,
    pub listen: Option<Address>,
    pub settings: Option<Value>,
    pub tag: String,
    pub allocate: Option<AllocationConfig>,
    pub stream_settings: Option<StreamConfig>,
    pub domain_override: Option<StringList>,
    pub sniffing: Option<SniffingConfig>,
}

impl InboundDetourConfig {
    /// Resolve the listen address and port list.
    ///
    /// A domain-socket listener drops any port list it was given.
    fn resolve_listen(&self) -> Result<(Option<IpOrDomain>, Option<PortList>), ConfigError> {
        match &self.listen {
            None => {
                let port = self.port.as_ref().ok_or(ConfigError::MissingPort(
                    "Listen on AnyIP but no Port(s) set in InboundDetour.",
                ))?;
                Ok((None, Some(port.build())))
            }
            Some(addr) if addr.is_ip() || addr.is_localhost() => {
                let port = self.port.as_ref().ok_or(ConfigError::MissingPort(
                    "Listen on specific ip without port in InboundDetour.",
                ))?;
                Ok((Some(addr.build()), Some(port.build())))
            }
            Some(addr) if addr.is_domain_socket() => Ok((Some(addr.build()), None)),
            Some(addr) => Err(ConfigError::Unsupported(format!(
                "unable to listen on domain address: {addr}"
            ))),
        }
    }

    pub fn build(
        &self,
        registry: &Registry<InboundSettings>,
    ) -> Result<InboundHandlerConfig, ConfigError> {
        let (listen, port_list) = self.resolve_listen()?;
        let mut receiver = ReceiverConfig {
            listen,
            port_list,
            ..ReceiverConfig::default()
        };

        if let Some(allocate) = &self.allocate {
            if let Some(concurrency) = allocate.required_concurrency()? {
                let ports = self.port.as_ref().map(PortSpec::build).unwrap_or_default();
                if u64::from(concurrency) >= ports.capacity() {
                    return Err(ConfigError::InsufficientPorts {
                        concurrency,
                        ports: ports.to_string(),
                    });
                }
            }
            receiver.allocation_strategy = Some(allocate.build()?);
        }

        if let Some(stream) = &self.stream_settings {
            receiver.stream_settings =
                Some(stream.build().context("failed to build stream settings")?);
        }
        if let Some(sniffing) = &self.sniffing {
            receiver.sniffing_settings =
                Some(sniffing.build().context("failed to build sniffing config")?);
        }
        if let Some(list) = &self.domain_override {
            receiver.domain_override =
                parse_domain_override(list).context("failed to parse inbound detour config")?;
        }

        let empty = Value::Object(Default::default());
        let settings = registry
            .load(self.settings.as_ref().unwrap_or(&empty), &self.protocol)
            .context("failed to load inbound detour config")?;
        receiver.receive_original_destination = settings.receives_original_destination();
        let proxy_settings = settings
            .build()
            .with_context(|| format!("failed to build {} inbound settings", self.protocol))?;

        tracing::debug!(tag = %self.tag, protocol = %self.protocol, "compiled inbound");
        Ok(InboundHandlerConfig {
            tag: self.tag.clone(),
            receiver_settings: receiver,
            proxy_settings,
        })
    }
}

//! Outbound sender entries (`outbounds`, `outbound`, `outboundDetour`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use xconf_core::handler::{ChainProxy, OutboundHandlerConfig, SenderConfig};
use xconf_core::transport::{SocketConfig as RuntimeSocketConfig, StreamConfig as RuntimeStream};

use crate::common::Address;
use crate::error::{ConfigError, ResultExt};
use crate::mux::MuxConfig;
use crate::protocols::OutboundSettings;
use crate::registry::{Buildable, Registry};
use crate::transport::StreamConfig;

/// `proxySettings`: send through another outbound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyConfig {
    pub tag: String,
    /// Chain at the socket level instead of wrapping the proxy protocol.
    pub transport_layer: bool,
}

impl ProxyConfig {
    pub fn build(&self) -> Result<ChainProxy, ConfigError> {
        if self.tag.is_empty() {
            return Err(ConfigError::Validation("proxy tag is not set".into()));
        }
        Ok(ChainProxy {
            tag: self.tag.clone(),
            transport_layer_proxy: self.transport_layer,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutboundDetourConfig {
    pub protocol: String,
    pub send_through: Option<Address>,
    pub tag: String,
    pub settings: Option<Value>,
    pub stream_settings: Option<StreamConfig>,
    pub proxy_settings: Option<ProxyConfig>,
    pub mux: Option<MuxConfig>,
}

impl OutboundDetourConfig {
    fn check_chain_proxy(&self) -> Result<(), ConfigError> {
        let (Some(stream), Some(proxy)) = (&self.stream_settings, &self.proxy_settings) else {
            return Ok(());
        };
        if !proxy.tag.is_empty() && stream.dialer_proxy().is_some() {
            return Err(ConfigError::Conflict);
        }
        Ok(())
    }

    pub fn build(
        &self,
        registry: &Registry<OutboundSettings>,
    ) -> Result<OutboundHandlerConfig, ConfigError> {
        self.check_chain_proxy()?;
        let mut sender = SenderConfig::default();

        if let Some(via) = &self.send_through {
            if via.is_domain() {
                return Err(ConfigError::Unsupported(format!(
                    "unable to send through: {via}"
                )));
            }
            sender.via = Some(via.build());
        }

        if let Some(stream) = &self.stream_settings {
            sender.stream_settings =
                Some(stream.build().context("failed to build stream settings")?);
        }

        if let Some(proxy) = &self.proxy_settings {
            let chain = proxy
                .build()
                .context("invalid outbound detour proxy settings")?;
            if chain.transport_layer_proxy {
                let stream = sender
                    .stream_settings
                    .get_or_insert_with(RuntimeStream::default);
                stream
                    .socket_settings
                    .get_or_insert_with(RuntimeSocketConfig::default)
                    .dialer_proxy = chain.tag;
            } else {
                sender.proxy_settings = Some(chain);
            }
        }

        if let Some(mux) = &self.mux {
            sender.multiplex_settings = Some(mux.build().context("failed to build Mux config")?);
        }

        let empty = Value::Object(Default::default());
        let settings = registry
            .load(self.settings.as_ref().unwrap_or(&empty), &self.protocol)
            .context("failed to parse to outbound detour config")?;
        let proxy_settings = settings
            .build()
            .with_context(|| format!("failed to build {} outbound settings", self.protocol))?;

        tracing::debug!(tag = %self.tag, protocol = %self.protocol, "compiled outbound");
        Ok(OutboundHandlerConfig {
            tag: self.tag.clone(),
            sender_settings: sender,
            proxy_settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use xconf_core::handler::Udp443Policy;
    use xconf_core::proxy::OutboundProxy;

    use super::*;
    use crate::error::ErrorKind;
    use crate::registry::Registries;

    fn build(v: Value) -> Result<OutboundHandlerConfig, ConfigError> {
        let entry: OutboundDetourConfig = serde_json::from_value(v).unwrap();
        entry.build(&Registries::standard().outbound)
    }

    #[test]
    fn freedom_without_settings() {
        let built = build(json!({"protocol": "freedom", "tag": "direct"})).unwrap();
        assert_eq!(built.tag, "direct");
        assert!(matches!(built.proxy_settings, OutboundProxy::Freedom(_)));
        assert_eq!(built.sender_settings, SenderConfig::default());
    }

    #[test]
    fn chain_tag_conflicts_with_dialer_proxy() {
        let err = build(json!({
            "protocol": "freedom",
            "proxySettings": {"tag": "a"},
            "streamSettings": {"sockopt": {"dialerProxy": "b"}}
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Conflict));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn domain_send_through_is_unsupported() {
        let err = build(json!({"protocol": "freedom", "sendThrough": "example.com"})).unwrap_err();
        assert!(matches!(err, ConfigError::Unsupported(_)));

        let built = build(json!({"protocol": "freedom", "sendThrough": "192.0.2.7"})).unwrap();
        assert!(built.sender_settings.via.is_some());
    }

    #[test]
    fn transport_layer_chain_becomes_dialer_proxy() {
        let built = build(json!({
            "protocol": "freedom",
            "proxySettings": {"tag": "upstream", "transportLayer": true}
        }))
        .unwrap();
        assert!(built.sender_settings.proxy_settings.is_none());
        let stream = built.sender_settings.stream_settings.unwrap();
        assert_eq!(stream.dialer_proxy(), Some("upstream"));

        let built = build(json!({
            "protocol": "freedom",
            "proxySettings": {"tag": "upstream", "transportLayer": true},
            "streamSettings": {"sockopt": {"mark": 7}}
        }))
        .unwrap();
        let sockopt = built
            .sender_settings
            .stream_settings
            .unwrap()
            .socket_settings
            .unwrap();
        assert_eq!(sockopt.mark, 7);
        assert_eq!(sockopt.dialer_proxy, "upstream");
    }

    #[test]
    fn plain_chain_is_kept() {
        let built = build(json!({"protocol": "freedom", "proxySettings": {"tag": "upstream"}}))
            .unwrap();
        let chain = built.sender_settings.proxy_settings.unwrap();
        assert_eq!(chain.tag, "upstream");
        assert!(!chain.transport_layer_proxy);
    }

    #[test]
    fn mux_policy() {
        let built = build(json!({"protocol": "freedom", "mux": {"enabled": true}})).unwrap();
        assert_eq!(
            built.sender_settings.multiplex_settings.unwrap().xudp_proxy_udp443,
            Udp443Policy::Reject
        );

        let err = build(json!({"protocol": "freedom", "mux": {"xudpProxyUDP443": "bogus"}}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().starts_with("failed to build Mux config > "));
    }

    #[test]
    fn malformed_settings_are_decode_errors() {
        let err = build(json!({"protocol": "blackhole", "settings": {"response": 5}}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}

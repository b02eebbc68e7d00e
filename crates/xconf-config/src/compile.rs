//! Top-level compilation of a [`Config`] into runtime module configurations.

use tracing::{debug, warn};
use xconf_core::app::{App, CompiledConfig};

use crate::apps::default_log;
use crate::common::PortSpec;
use crate::error::{ConfigError, ResultExt};
use crate::inbound::InboundDetourConfig;
use crate::outbound::OutboundDetourConfig;
use crate::registry::Registries;
use crate::transport::StreamConfig;
use crate::Config;

impl Config {
    /// Compile with the standard protocol registries.
    pub fn build(&self) -> Result<CompiledConfig, ConfigError> {
        self.build_with(&Registries::standard())
    }

    /// Compile with caller-supplied registries.
    ///
    /// Fails on the first error; nothing is returned for a partially valid
    /// document.
    pub fn build_with(&self, registries: &Registries) -> Result<CompiledConfig, ConfigError> {
        let app = self.build_apps()?;

        let mut inbound = Vec::new();
        for (i, mut entry) in self.fold_inbounds().into_iter().enumerate() {
            self.overlay_transport(&mut entry.stream_settings);
            let handler = entry
                .build(&registries.inbound)
                .with_context(|| format!("failed to build inbound #{i} (tag \"{}\")", entry.tag))?;
            inbound.push(handler);
        }

        let mut outbound = Vec::new();
        for (i, mut entry) in self.fold_outbounds().into_iter().enumerate() {
            self.overlay_transport(&mut entry.stream_settings);
            let handler = entry
                .build(&registries.outbound)
                .with_context(|| format!("failed to build outbound #{i} (tag \"{}\")", entry.tag))?;
            outbound.push(handler);
        }

        debug!(
            apps = app.len(),
            inbounds = inbound.len(),
            outbounds = outbound.len(),
            "configuration compiled"
        );
        Ok(CompiledConfig {
            app,
            inbound,
            outbound,
        })
    }

    /// Runtime modules in start order.
    fn build_apps(&self) -> Result<Vec<App>, ConfigError> {
        let mut apps = vec![App::Dispatcher, App::InboundManager, App::OutboundManager];

        if let Some(api) = &self.api {
            apps.push(App::Api(api.build().context("failed to build API config")?));
        }
        if let Some(metrics) = &self.metrics {
            apps.push(App::Metrics(
                metrics.build().context("failed to build metrics config")?,
            ));
        }
        if self.stats.is_some() {
            apps.push(App::Stats);
        }

        let log = match &self.log {
            Some(log) => log.build().context("failed to build log config")?,
            None => default_log(),
        };
        apps.insert(0, App::Log(log));

        if let Some(routing) = &self.routing {
            apps.push(App::Router(
                routing.build().context("failed to build routing config")?,
            ));
        }
        if let Some(dns) = &self.dns {
            apps.push(App::Dns(dns.build().context("failed to parse DNS config")?));
        }
        if let Some(policy) = &self.policy {
            apps.push(App::Policy(
                policy.build().context("failed to build policy config")?,
            ));
        }
        if let Some(reverse) = &self.reverse {
            apps.push(App::Reverse(
                reverse.build().context("failed to build reverse config")?,
            ));
        }
        if let Some(fake_dns) = &self.fake_dns {
            let fake_dns = fake_dns.build().context("failed to build fake DNS config")?;
            apps.insert(0, App::FakeDns(fake_dns));
        }
        if let Some(observatory) = &self.observatory {
            apps.push(App::Observatory(
                observatory
                    .build()
                    .context("failed to build observatory config")?,
            ));
        }
        if let Some(tun) = &self.tun {
            apps.push(App::Tun(tun.build().context("failed to build tun config")?));
        }
        Ok(apps)
    }

    /// `inbound`, then `inboundDetour`, then `inbounds`.
    ///
    /// The deprecated top-level `port` fills in the first entry's port when
    /// it has none.
    pub(crate) fn fold_inbounds(&self) -> Vec<InboundDetourConfig> {
        let mut inbounds = Vec::new();
        if let Some(entry) = &self.inbound {
            warn!("\"inbound\" is deprecated, use \"inbounds\" instead");
            inbounds.push(entry.clone());
        }
        if let Some(detours) = &self.inbound_detour {
            warn!("\"inboundDetour\" is deprecated, use \"inbounds\" instead");
            inbounds.extend(detours.iter().cloned());
        }
        inbounds.extend(self.inbounds.iter().cloned());

        if self.port > 0
            && let Some(first) = inbounds.first_mut()
            && first.port.is_none()
        {
            warn!(port = self.port, "top-level \"port\" is deprecated");
            first.port = Some(PortSpec::single(self.port));
        }
        inbounds
    }

    /// `outbound`, then `outboundDetour`, then `outbounds`.
    pub(crate) fn fold_outbounds(&self) -> Vec<OutboundDetourConfig> {
        let mut outbounds = Vec::new();
        if let Some(entry) = &self.outbound {
            warn!("\"outbound\" is deprecated, use \"outbounds\" instead");
            outbounds.push(entry.clone());
        }
        if let Some(detours) = &self.outbound_detour {
            warn!("\"outboundDetour\" is deprecated, use \"outbounds\" instead");
            outbounds.extend(detours.iter().cloned());
        }
        outbounds.extend(self.outbounds.iter().cloned());
        outbounds
    }

    fn overlay_transport(&self, stream: &mut Option<StreamConfig>) {
        if let Some(transport) = &self.transport {
            stream
                .get_or_insert_with(StreamConfig::default)
                .apply_transport(transport);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use xconf_core::app::AppKind;
    use xconf_core::net::PortRange;
    use xconf_core::transport::TransportSettings;

    use super::*;
    use crate::error::ErrorKind;

    fn doc(v: Value) -> Config {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn legacy_fields_fold_in_order() {
        let cfg = doc(json!({
            "inbound": {"protocol": "socks", "tag": "legacy"},
            "inboundDetour": [{"protocol": "http", "port": 8080, "tag": "detour"}],
            "inbounds": [{"protocol": "socks", "port": 1081, "tag": "modern"}],
            "port": 1080
        }));
        let folded = cfg.fold_inbounds();
        let tags: Vec<_> = folded.iter().map(|i| i.tag.as_str()).collect();
        assert_eq!(tags, ["legacy", "detour", "modern"]);
        assert_eq!(
            folded[0].port.as_ref().unwrap().ranges(),
            [PortRange::single(1080)]
        );

        let built = cfg.build().unwrap();
        assert_eq!(built.inbound.len(), 3);
        assert_eq!(built.inbound[0].tag, "legacy");
    }

    #[test]
    fn legacy_port_does_not_override_explicit_port() {
        let cfg = doc(json!({
            "port": 1080,
            "inbounds": [{"protocol": "socks", "port": 2000}]
        }));
        assert_eq!(
            cfg.fold_inbounds()[0].port.as_ref().unwrap().ranges(),
            [PortRange::single(2000)]
        );
    }

    #[test]
    fn outbounds_fold_in_order() {
        let cfg = doc(json!({
            "outbounds": [{"protocol": "blackhole", "tag": "c"}],
            "outboundDetour": [{"protocol": "freedom", "tag": "b"}],
            "outbound": {"protocol": "freedom", "tag": "a"}
        }));
        let built = cfg.build().unwrap();
        let tags: Vec<_> = built.outbound.iter().map(|o| o.tag.as_str()).collect();
        assert_eq!(tags, ["a", "b", "c"]);
    }

    #[test]
    fn transport_defaults_reach_every_entry() {
        let cfg = doc(json!({
            "transport": {"wsSettings": {"path": "/ray"}},
            "inbounds": [{"protocol": "socks", "port": 1080}],
            "outbounds": [{"protocol": "freedom", "streamSettings": {"network": "ws"}}]
        }));
        let built = cfg.build().unwrap();
        let inbound = built.inbound[0].receiver_settings.stream_settings.as_ref();
        assert_eq!(inbound.unwrap().transport_settings.len(), 1);
        let outbound = built.outbound[0].sender_settings.stream_settings.as_ref();
        match &outbound.unwrap().transport_settings[..] {
            [TransportSettings::WebSocket(ws)] => assert_eq!(ws.path, "/ray"),
            other => panic!("unexpected transport settings: {other:?}"),
        }
    }

    #[test]
    fn no_transport_leaves_stream_unset() {
        let cfg = doc(json!({"inbounds": [{"protocol": "socks", "port": 1080}]}));
        let built = cfg.build().unwrap();
        assert!(built.inbound[0].receiver_settings.stream_settings.is_none());
    }

    #[test]
    fn full_app_order() {
        let cfg = doc(json!({
            "api": {"tag": "api", "services": ["StatsService"]},
            "metrics": {"tag": "metrics"},
            "stats": {},
            "log": {"loglevel": "info"},
            "routing": {},
            "dns": {"servers": ["1.1.1.1"]},
            "policy": {},
            "reverse": {},
            "fakeDns": {"ipPool": "198.18.0.0/15", "poolSize": 65535},
            "observatory": {},
            "tun": {}
        }));
        assert_eq!(
            cfg.build().unwrap().app_kinds(),
            [
                AppKind::FakeDns,
                AppKind::Log,
                AppKind::Dispatcher,
                AppKind::InboundManager,
                AppKind::OutboundManager,
                AppKind::Api,
                AppKind::Metrics,
                AppKind::Stats,
                AppKind::Router,
                AppKind::Dns,
                AppKind::Policy,
                AppKind::Reverse,
                AppKind::Observatory,
                AppKind::Tun,
            ]
        );
    }

    #[test]
    fn app_errors_abort_before_handlers() {
        let cfg = doc(json!({
            "dns": {"queryStrategy": "UseIPv5"},
            "inbounds": [{"protocol": "socks"}]
        }));
        let err = cfg.build().unwrap_err();
        assert!(err.to_string().starts_with("failed to parse DNS config > "));
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn handler_errors_name_the_entry() {
        let cfg = doc(json!({
            "inbounds": [
                {"protocol": "socks", "port": 1080, "tag": "ok"},
                {"protocol": "socks", "tag": "broken"}
            ]
        }));
        let err = cfg.build().unwrap_err();
        assert!(
            err.to_string()
                .starts_with("failed to build inbound #1 (tag \"broken\") > ")
        );
        assert!(matches!(err.root_cause(), ConfigError::MissingPort(_)));
    }
}

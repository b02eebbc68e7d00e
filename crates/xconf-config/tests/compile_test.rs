//! End-to-end compilation tests.
//!
//! These tests drive whole documents through loading, override merging and
//! compilation:
//! - listener validation
//! - transport defaults overlay
//! - override merge outcomes
//! - runtime module ordering
#![allow(clippy::tests_outside_test_module)]

use std::io::Write;

use serde_json::{Value, json};
use xconf_config::transport::{StreamConfig, TransportConfig};
use xconf_config::{Config, ConfigError, ErrorKind, OverrideOptions, load_config, load_configs};
use xconf_core::app::{AppKind, CompiledConfig};
use xconf_core::handler::Udp443Policy;
use xconf_core::net::PortRange;

fn doc(v: Value) -> Config {
    serde_json::from_value(v).unwrap()
}

fn compile(v: Value) -> Result<CompiledConfig, ConfigError> {
    doc(v).build()
}

fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

// ============================================================================
// Listener validation
// ============================================================================

#[test]
fn inbound_without_listen_or_port_fails() {
    for protocol in ["socks", "http", "vmess", "dokodemo-door"] {
        let err = compile(json!({"inbounds": [{"protocol": protocol}]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{protocol}");
        assert!(matches!(err.root_cause(), ConfigError::MissingPort(_)));
    }
}

#[test]
fn random_concurrency_fails_iff_not_below_capacity() {
    for (ports, capacity) in [("2000-2003", 4u32), ("2000,2002,2004-2005", 4), ("7000", 1)] {
        for concurrency in 0..=capacity + 2 {
            let result = compile(json!({
                "inbounds": [{
                    "protocol": "socks",
                    "port": ports,
                    "allocate": {"strategy": "random", "concurrency": concurrency}
                }]
            }));
            if concurrency >= capacity {
                let err = result.unwrap_err();
                assert!(
                    matches!(err.root_cause(), ConfigError::InsufficientPorts { .. }),
                    "{ports} / {concurrency}"
                );
                assert!(err.to_string().contains("not enough ports"));
            } else {
                assert!(result.is_ok(), "{ports} / {concurrency}");
            }
        }
    }
}

#[test]
fn chain_proxy_and_dialer_proxy_conflict() {
    let err = compile(json!({
        "outbounds": [{
            "protocol": "vmess",
            "settings": {"vnext": []},
            "proxySettings": {"tag": "relay"},
            "streamSettings": {"sockopt": {"dialerProxy": "other"}}
        }]
    }))
    .unwrap_err();
    assert!(matches!(err.root_cause(), ConfigError::Conflict));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

// ============================================================================
// Transport defaults overlay
// ============================================================================

#[test]
fn overlay_is_idempotent_and_non_destructive() {
    let mut stream: StreamConfig = serde_json::from_value(json!({
        "network": "tcp",
        "tcpSettings": {"acceptProxyProtocol": true},
        "kcpSettings": {"mtu": 1200}
    }))
    .unwrap();
    let original = stream.clone();
    let defaults: TransportConfig = serde_json::from_value(json!({
        "tcpSettings": {"header": {"type": "http"}},
        "kcpSettings": {"mtu": 1400},
        "wsSettings": {"path": "/ws"},
        "dsSettings": {"path": "/run/proxy.sock"}
    }))
    .unwrap();

    stream.apply_transport(&defaults);
    let once = stream.clone();
    stream.apply_transport(&defaults);

    assert_eq!(stream, once);
    assert_eq!(stream.tcp_settings, original.tcp_settings);
    assert_eq!(stream.kcp_settings, original.kcp_settings);
    assert_eq!(stream.ws_settings, defaults.ws_settings);
    assert_eq!(stream.ds_settings, defaults.ds_settings);
    assert_eq!(stream.http_settings, None);
}

// ============================================================================
// Override merge
// ============================================================================

fn merge_base() -> Config {
    doc(json!({
        "inbounds": [
            {"protocol": "socks", "port": 1080, "tag": "a"},
            {"protocol": "socks", "port": 1081, "tag": "b"},
            {"protocol": "socks", "port": 1082, "tag": "c"}
        ],
        "outbounds": [
            {"protocol": "freedom", "tag": "direct"},
            {"protocol": "blackhole", "tag": "block"}
        ]
    }))
}

#[test]
fn override_single_matching_tag_keeps_order() {
    let mut cfg = merge_base();
    cfg.override_with(
        doc(json!({"inbounds": [{"protocol": "http", "port": 9000, "tag": "b"}]})),
        "b.json",
        &OverrideOptions::default(),
    );
    let entries: Vec<_> = cfg
        .inbounds
        .iter()
        .map(|i| (i.tag.as_str(), i.protocol.as_str()))
        .collect();
    assert_eq!(entries, [("a", "socks"), ("b", "http"), ("c", "socks")]);
    assert_eq!(cfg.inbounds[0], merge_base().inbounds[0]);
    assert_eq!(cfg.inbounds[2], merge_base().inbounds[2]);
}

#[test]
fn override_single_unmatched_tag() {
    let mut cfg = merge_base();
    cfg.override_with(
        doc(json!({"inbounds": [{"protocol": "http", "port": 9000, "tag": "new"}]})),
        "new.json",
        &OverrideOptions::default(),
    );
    assert_eq!(cfg.inbounds.last().unwrap().tag, "new");
    assert_eq!(cfg.inbounds.len(), 4);

    let outbound = || doc(json!({"outbounds": [{"protocol": "freedom", "tag": "new"}]}));
    let tags = |cfg: &Config| -> Vec<String> {
        cfg.outbounds.iter().map(|o| o.tag.clone()).collect()
    };

    let mut prepended = merge_base();
    prepended.override_with(outbound(), "new.json", &OverrideOptions::default());
    assert_eq!(tags(&prepended), ["new", "direct", "block"]);

    let mut appended = merge_base();
    appended.override_with(
        outbound(),
        "new.json",
        &OverrideOptions {
            append_unmatched_outbound: true,
        },
    );
    assert_eq!(tags(&appended), ["direct", "block", "new"]);
}

#[test]
fn override_files_in_order() {
    let base = write_temp(
        ".json",
        r#"{"inbounds": [{"protocol": "socks", "port": 1080, "tag": "socks"}]}"#,
    );
    let patch = write_temp(
        ".yaml",
        "inbounds:\n  - protocol: socks\n    port: 2080\n    tag: socks\nlog:\n  loglevel: debug\n",
    );
    let cfg = load_configs(&[base.path(), patch.path()], &OverrideOptions::default()).unwrap();
    assert_eq!(cfg.inbounds.len(), 1);
    assert_eq!(
        cfg.inbounds[0].port.as_ref().unwrap().ranges(),
        [PortRange::single(2080)]
    );
    assert!(cfg.log.is_some());
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn socks_listener_with_default_modules() {
    let built = compile(json!({
        "inbounds": [{"protocol": "socks", "listen": "127.0.0.1", "port": "1080"}]
    }))
    .unwrap();

    assert_eq!(built.inbound.len(), 1);
    let receiver = &built.inbound[0].receiver_settings;
    assert_eq!(
        receiver.port_list.as_ref().unwrap().ranges,
        [PortRange::single(1080)]
    );
    assert!(built.outbound.is_empty());
    assert_eq!(
        built.app_kinds(),
        [
            AppKind::Log,
            AppKind::Dispatcher,
            AppKind::InboundManager,
            AppKind::OutboundManager
        ]
    );
}

#[test]
fn fake_dns_precedes_log() {
    let built = compile(json!({
        "fakeDns": {"ipPool": "198.18.0.0/15", "poolSize": 65535},
        "log": {"loglevel": "info"}
    }))
    .unwrap();
    let kinds = built.app_kinds();
    assert_eq!(kinds[0], AppKind::FakeDns);
    assert_eq!(kinds[1], AppKind::Log);
}

#[test]
fn mux_udp443_policy() {
    let built = compile(json!({
        "outbounds": [{"protocol": "freedom", "mux": {"enabled": true, "concurrency": 8}}]
    }))
    .unwrap();
    let mux = built.outbound[0]
        .sender_settings
        .multiplex_settings
        .as_ref()
        .unwrap();
    assert_eq!(mux.xudp_proxy_udp443, Udp443Policy::Reject);

    let err = compile(json!({
        "outbounds": [{"protocol": "freedom", "mux": {"xudpProxyUDP443": "bogus"}}]
    }))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn unknown_protocol_is_schema_error() {
    let err = compile(json!({"outbounds": [{"protocol": "carrier-pigeon"}]})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(matches!(err.root_cause(), ConfigError::UnknownProtocol { .. }));
}

#[test]
fn malformed_settings_name_the_protocol() {
    let err = compile(json!({
        "inbounds": [{"protocol": "VMess", "port": 443, "settings": {"clients": "nobody"}}]
    }))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.to_string().contains("\"vmess\""));
}

#[test]
fn compiled_config_serializes() {
    let built = compile(json!({
        "inbounds": [{"protocol": "socks", "port": 1080, "tag": "in"}],
        "outbounds": [{"protocol": "freedom", "tag": "out"}]
    }))
    .unwrap();
    let value = serde_json::to_value(&built).unwrap();
    assert_eq!(value["inbound"][0]["tag"], "in");
    assert_eq!(value["outbound"][0]["tag"], "out");
}

// ============================================================================
// Loader formats
// ============================================================================

#[test]
fn loads_every_supported_format() {
    let json = write_temp(".json", r#"{"inbounds": [{"protocol": "socks", "port": 1080}]}"#);
    let jsonc = write_temp(
        ".jsonc",
        "{\n  // comment\n  \"inbounds\": [{\"protocol\": \"socks\", \"port\": 1080}]\n}",
    );
    let yaml = write_temp(".yml", "inbounds:\n  - protocol: socks\n    port: 1080\n");
    let toml = write_temp(".toml", "[[inbounds]]\nprotocol = \"socks\"\nport = 1080\n");

    for file in [&json, &jsonc, &yaml, &toml] {
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.inbounds.len(), 1, "{}", file.path().display());
        assert!(cfg.build().is_ok());
    }
}

#[test]
fn loader_error_kinds() {
    let broken = write_temp(".json", "{\"inbounds\": [");
    assert_eq!(load_config(broken.path()).unwrap_err().kind(), ErrorKind::Syntax);

    let unknown = write_temp(".conf", "{}");
    assert!(matches!(
        load_config(unknown.path()),
        Err(ConfigError::UnsupportedFormat)
    ));

    let err = load_config("/nonexistent/xconf.json").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

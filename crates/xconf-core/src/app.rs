//! Runtime module (app) configurations and the compiled top-level result.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::handler::{InboundHandlerConfig, OutboundHandlerConfig};
use crate::net::{Network, PortList};

/// Output of one compilation pass.
///
/// The runtime starts `app` entries in list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledConfig {
    pub app: Vec<App>,
    pub inbound: Vec<InboundHandlerConfig>,
    pub outbound: Vec<OutboundHandlerConfig>,
}

impl CompiledConfig {
    pub fn app_kinds(&self) -> Vec<AppKind> {
        self.app.iter().map(App::kind).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppKind {
    Log,
    Dispatcher,
    InboundManager,
    OutboundManager,
    Api,
    Metrics,
    Stats,
    Router,
    Dns,
    Policy,
    Reverse,
    FakeDns,
    Observatory,
    Tun,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "app", rename_all = "snake_case")]
pub enum App {
    Log(LogApp),
    Dispatcher,
    InboundManager,
    OutboundManager,
    Api(ApiApp),
    Metrics(MetricsApp),
    Stats,
    Router(RouterApp),
    Dns(DnsApp),
    Policy(PolicyApp),
    Reverse(ReverseApp),
    FakeDns(FakeDnsApp),
    Observatory(ObservatoryApp),
    Tun(TunApp),
}

impl App {
    pub fn kind(&self) -> AppKind {
        match self {
            App::Log(_) => AppKind::Log,
            App::Dispatcher => AppKind::Dispatcher,
            App::InboundManager => AppKind::InboundManager,
            App::OutboundManager => AppKind::OutboundManager,
            App::Api(_) => AppKind::Api,
            App::Metrics(_) => AppKind::Metrics,
            App::Stats => AppKind::Stats,
            App::Router(_) => AppKind::Router,
            App::Dns(_) => AppKind::Dns,
            App::Policy(_) => AppKind::Policy,
            App::Reverse(_) => AppKind::Reverse,
            App::FakeDns(_) => AppKind::FakeDns,
            App::Observatory(_) => AppKind::Observatory,
            App::Tun(_) => AppKind::Tun,
        }
    }
}

// ============================================================================
// Log
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogTarget {
    None,
    Console,
    File(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogApp {
    pub error_log: LogTarget,
    pub error_level: LogLevel,
    pub access_log: LogTarget,
    pub dns_log: bool,
}

// ============================================================================
// API / Metrics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiService {
    HandlerService,
    LoggerService,
    StatsService,
    RoutingService,
    ReflectionService,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiApp {
    pub tag: String,
    pub services: Vec<ApiService>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsApp {
    pub tag: String,
}

// ============================================================================
// Router
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingDomainStrategy {
    #[default]
    AsIs,
    IpIfNonMatch,
    IpOnDemand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTarget {
    Outbound(String),
    Balancer(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    pub target: RuleTarget,
    pub rule_tag: String,
    pub domains: Vec<String>,
    pub ips: Vec<String>,
    pub port_list: Option<PortList>,
    pub source_port_list: Option<PortList>,
    pub networks: Vec<Network>,
    pub source_ips: Vec<String>,
    pub users: Vec<String>,
    pub inbound_tags: Vec<String>,
    pub protocols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balancer {
    pub tag: String,
    pub selector: Vec<String>,
    pub strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterApp {
    pub domain_strategy: RoutingDomainStrategy,
    pub rules: Vec<RoutingRule>,
    pub balancers: Vec<Balancer>,
}

// ============================================================================
// DNS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStrategy {
    #[default]
    UseIp,
    UseIpv4,
    UseIpv6,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameServer {
    pub address: String,
    pub port: Option<u16>,
    pub domains: Vec<String>,
    pub expect_ips: Vec<String>,
    pub skip_fallback: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsApp {
    pub servers: Vec<NameServer>,
    pub hosts: BTreeMap<String, Vec<String>>,
    pub client_ip: Option<IpAddr>,
    pub tag: String,
    pub query_strategy: QueryStrategy,
    pub disable_cache: bool,
    pub disable_fallback: bool,
}

// ============================================================================
// Policy
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPolicy {
    pub handshake_secs: Option<u32>,
    pub conn_idle_secs: Option<u32>,
    pub uplink_only_secs: Option<u32>,
    pub downlink_only_secs: Option<u32>,
    pub stats_user_uplink: bool,
    pub stats_user_downlink: bool,
    /// Per-connection buffer in KiB; negative means unlimited.
    pub buffer_size_kb: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPolicy {
    pub stats_inbound_uplink: bool,
    pub stats_inbound_downlink: bool,
    pub stats_outbound_uplink: bool,
    pub stats_outbound_downlink: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyApp {
    pub levels: BTreeMap<u32, LevelPolicy>,
    pub system: SystemPolicy,
}

// ============================================================================
// Reverse / Fake-DNS / Observatory / TUN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseEndpoint {
    pub tag: String,
    pub domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseApp {
    pub bridges: Vec<ReverseEndpoint>,
    pub portals: Vec<ReverseEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeDnsPool {
    pub ip_pool: String,
    pub pool_size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeDnsApp {
    pub pools: Vec<FakeDnsPool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservatoryApp {
    pub subject_selector: Vec<String>,
    pub probe_url: String,
    pub probe_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunApp {
    pub name: String,
    pub mtu: u32,
    pub user_level: u32,
}

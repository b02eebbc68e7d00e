//! Sub-documents for the optional runtime modules.

pub mod api;
pub mod dns;
pub mod fakedns;
pub mod log;
pub mod observatory;
pub mod policy;
pub mod reverse;
pub mod router;
pub mod tun;

pub use api::{ApiConfig, MetricsConfig, StatsConfig};
pub use dns::DnsConfig;
pub use fakedns::FakeDnsConfig;
pub use log::{LogConfig, default_log};
pub use observatory::ObservatoryConfig;
pub use policy::PolicyConfig;
pub use reverse::ReverseConfig;
pub use router::RouterConfig;
pub use tun::TunConfig;

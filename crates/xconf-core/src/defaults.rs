//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Log Defaults
// ============================================================================

/// Error log level used when the document has no `log` section.
pub const DEFAULT_LOG_LEVEL: &str = "warning";
/// Value of `log.access` / `log.error` that disables the log entirely.
pub const LOG_PATH_NONE: &str = "none";

// ============================================================================
// Multiplexing Defaults
// ============================================================================

/// Default `mux.xudpProxyUDP443` policy.
pub const DEFAULT_XUDP_PROXY_UDP443: &str = "reject";

// ============================================================================
// Transport Defaults
// ============================================================================

/// Default stream network.
pub const DEFAULT_NETWORK: &str = "tcp";
/// Default dokodemo-door network list.
pub const DEFAULT_DOKODEMO_NETWORK: &str = "tcp";
/// Minimum mKCP MTU.
pub const KCP_MTU_MIN: u32 = 576;
/// Maximum mKCP MTU.
pub const KCP_MTU_MAX: u32 = 1460;
/// Default mKCP MTU.
pub const DEFAULT_KCP_MTU: u32 = 1350;
/// Minimum mKCP TTI in milliseconds.
pub const KCP_TTI_MIN: u32 = 10;
/// Maximum mKCP TTI in milliseconds.
pub const KCP_TTI_MAX: u32 = 100;
/// Default mKCP TTI in milliseconds.
pub const DEFAULT_KCP_TTI: u32 = 50;
/// Default mKCP uplink capacity (MB/s).
pub const DEFAULT_KCP_UPLINK_CAPACITY: u32 = 5;
/// Default mKCP downlink capacity (MB/s).
pub const DEFAULT_KCP_DOWNLINK_CAPACITY: u32 = 20;
/// Default mKCP read/write buffer size (MB).
pub const DEFAULT_KCP_BUFFER_SIZE: u32 = 2;
/// Default HTTP/2 request method.
pub const DEFAULT_HTTP_METHOD: &str = "PUT";

// ============================================================================
// Fake-DNS Defaults
// ============================================================================

/// Default fake-DNS IPv4 pool.
pub const DEFAULT_FAKEDNS_IP_POOL: &str = "198.18.0.0/15";
/// Default fake-DNS pool size.
pub const DEFAULT_FAKEDNS_POOL_SIZE: u64 = 65535;

// ============================================================================
// Observatory Defaults
// ============================================================================

/// Default observatory probe URL.
pub const DEFAULT_OBSERVATORY_PROBE_URL: &str = "https://www.google.com/generate_204";
/// Default observatory probe interval in milliseconds.
pub const DEFAULT_OBSERVATORY_PROBE_INTERVAL_MS: u64 = 60_000;

// ============================================================================
// Device Defaults
// ============================================================================

/// Default TUN device name.
pub const DEFAULT_TUN_NAME: &str = "xray0";
/// Default TUN device MTU.
pub const DEFAULT_TUN_MTU: u32 = 1500;
/// Default WireGuard MTU.
pub const DEFAULT_WIREGUARD_MTU: u32 = 1420;

// ============================================================================
// Protocol Constants
// ============================================================================

/// MTProto secret length in hex chars (16 bytes).
pub const MTPROTO_SECRET_HEX_LEN: usize = 32;
/// Highest valid port number.
pub const MAX_PORT: u32 = 65535;

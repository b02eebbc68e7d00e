//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `xconf_core::defaults`.

use xconf_core::defaults;

/// Generate default value functions that forward to xconf_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_kcp_mtu               => DEFAULT_KCP_MTU: u32,
    default_kcp_tti               => DEFAULT_KCP_TTI: u32,
    default_kcp_uplink_capacity   => DEFAULT_KCP_UPLINK_CAPACITY: u32,
    default_kcp_downlink_capacity => DEFAULT_KCP_DOWNLINK_CAPACITY: u32,
    default_kcp_buffer_size       => DEFAULT_KCP_BUFFER_SIZE: u32,
    default_fakedns_pool_size     => DEFAULT_FAKEDNS_POOL_SIZE: u64,
    default_tun_mtu               => DEFAULT_TUN_MTU: u32,
    default_wireguard_mtu         => DEFAULT_WIREGUARD_MTU: u32,
}

default_string_fns! {
    default_network         => DEFAULT_NETWORK,
    default_fakedns_ip_pool => DEFAULT_FAKEDNS_IP_POOL,
    default_probe_url       => DEFAULT_OBSERVATORY_PROBE_URL,
    default_tun_name        => DEFAULT_TUN_NAME,
    default_http_method     => DEFAULT_HTTP_METHOD,
}

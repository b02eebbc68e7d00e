//! Overlaying one configuration document onto another.

use tracing::info;

use crate::Config;

/// Knobs for [`Config::override_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideOptions {
    /// Place a single unmatched override outbound after the base list
    /// instead of in front of it.
    pub append_unmatched_outbound: bool,
}

/// Index of the first entry carrying `tag`. An empty tag matches nothing.
fn find_tag<T>(entries: &[T], tag: &str, tag_of: impl Fn(&T) -> &str) -> Option<usize> {
    if tag.is_empty() {
        return None;
    }
    entries.iter().position(|e| tag_of(e) == tag)
}

macro_rules! replace_present {
    ($base:expr, $other:expr, $($field:ident),+ $(,)?) => {
        $(
            if $other.$field.is_some() {
                $base.$field = $other.$field.take();
            }
        )+
    };
}

impl Config {
    /// Apply `other` on top of `self`.
    ///
    /// Sub-documents present in `other` replace the base ones. A single
    /// override inbound or outbound is matched by tag and replaced in place;
    /// otherwise it is added to the list. Any other non-empty override list
    /// replaces the base list. `source` names the override in log output.
    pub fn override_with(&mut self, mut other: Config, source: &str, options: &OverrideOptions) {
        replace_present!(
            self,
            other,
            log,
            routing,
            dns,
            transport,
            policy,
            api,
            metrics,
            stats,
            reverse,
            fake_dns,
            observatory,
            tun,
            inbound,
            outbound,
            inbound_detour,
            outbound_detour,
        );

        if !other.inbounds.is_empty() {
            if !self.inbounds.is_empty() && other.inbounds.len() == 1 {
                let entry = other.inbounds.remove(0);
                match find_tag(&self.inbounds, &entry.tag, |e| e.tag.as_str()) {
                    Some(idx) => {
                        info!(source, tag = %entry.tag, "updated inbound with tag");
                        self.inbounds[idx] = entry;
                    }
                    None => {
                        info!(source, tag = %entry.tag, "appended inbound with tag");
                        self.inbounds.push(entry);
                    }
                }
            } else {
                self.inbounds = other.inbounds;
            }
        }

        if !other.outbounds.is_empty() {
            if !self.outbounds.is_empty() && other.outbounds.len() == 1 {
                let entry = other.outbounds.remove(0);
                match find_tag(&self.outbounds, &entry.tag, |e| e.tag.as_str()) {
                    Some(idx) => {
                        info!(source, tag = %entry.tag, "updated outbound with tag");
                        self.outbounds[idx] = entry;
                    }
                    None if options.append_unmatched_outbound => {
                        info!(source, tag = %entry.tag, "appended outbound with tag");
                        self.outbounds.push(entry);
                    }
                    None => {
                        info!(source, tag = %entry.tag, "prepended outbound with tag");
                        self.outbounds.insert(0, entry);
                    }
                }
            } else {
                self.outbounds = other.outbounds;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use xconf_core::net::PortRange;

    use super::*;

    fn doc(v: Value) -> Config {
        serde_json::from_value(v).unwrap()
    }

    fn outbound_tags(cfg: &Config) -> Vec<&str> {
        cfg.outbounds.iter().map(|o| o.tag.as_str()).collect()
    }

    fn base() -> Config {
        doc(json!({
            "log": {"loglevel": "debug"},
            "inbounds": [
                {"protocol": "socks", "port": 1080, "tag": "socks-in"},
                {"protocol": "http", "port": 8080, "tag": "http-in"}
            ],
            "outbounds": [
                {"protocol": "freedom", "tag": "direct"},
                {"protocol": "blackhole", "tag": "block"}
            ]
        }))
    }

    #[test]
    fn matching_tag_replaces_in_place() {
        let mut cfg = base();
        cfg.override_with(
            doc(json!({"inbounds": [{"protocol": "socks", "port": 2080, "tag": "socks-in"}]})),
            "override.json",
            &OverrideOptions::default(),
        );
        assert_eq!(cfg.inbounds.len(), 2);
        assert_eq!(cfg.inbounds[0].tag, "socks-in");
        assert_eq!(
            cfg.inbounds[0].port.as_ref().unwrap().ranges(),
            [PortRange::single(2080)]
        );
        assert_eq!(cfg.inbounds[1].tag, "http-in");

        cfg.override_with(
            doc(json!({"outbounds": [{"protocol": "dns", "tag": "block"}]})),
            "override.json",
            &OverrideOptions::default(),
        );
        assert_eq!(outbound_tags(&cfg), ["direct", "block"]);
        assert_eq!(cfg.outbounds[1].protocol, "dns");
    }

    #[test]
    fn unmatched_inbound_is_appended() {
        let mut cfg = base();
        cfg.override_with(
            doc(json!({"inbounds": [{"protocol": "dokodemo-door", "port": 53, "tag": "dns-in"}]})),
            "override.json",
            &OverrideOptions::default(),
        );
        let tags: Vec<_> = cfg.inbounds.iter().map(|i| i.tag.as_str()).collect();
        assert_eq!(tags, ["socks-in", "http-in", "dns-in"]);
    }

    #[test]
    fn unmatched_outbound_placement_follows_flag() {
        let single = || doc(json!({"outbounds": [{"protocol": "freedom", "tag": "extra"}]}));

        let mut cfg = base();
        cfg.override_with(single(), "override.json", &OverrideOptions::default());
        assert_eq!(outbound_tags(&cfg), ["extra", "direct", "block"]);

        let mut cfg = base();
        let options = OverrideOptions {
            append_unmatched_outbound: true,
        };
        cfg.override_with(single(), "override.json", &options);
        assert_eq!(outbound_tags(&cfg), ["direct", "block", "extra"]);
    }

    #[test]
    fn empty_tag_never_matches() {
        let mut cfg = doc(json!({"inbounds": [{"protocol": "socks", "port": 1080}]}));
        cfg.override_with(
            doc(json!({"inbounds": [{"protocol": "http", "port": 8080}]})),
            "override.json",
            &OverrideOptions::default(),
        );
        assert_eq!(cfg.inbounds.len(), 2);
        assert_eq!(cfg.inbounds[0].protocol, "socks");
    }

    #[test]
    fn longer_list_or_empty_base_replaces() {
        let mut cfg = base();
        cfg.override_with(
            doc(json!({"outbounds": [
                {"protocol": "freedom", "tag": "a"},
                {"protocol": "freedom", "tag": "direct"}
            ]})),
            "override.json",
            &OverrideOptions::default(),
        );
        assert_eq!(outbound_tags(&cfg), ["a", "direct"]);

        let mut cfg = Config::default();
        cfg.override_with(
            doc(json!({"outbounds": [{"protocol": "freedom", "tag": "only"}]})),
            "override.json",
            &OverrideOptions::default(),
        );
        assert_eq!(outbound_tags(&cfg), ["only"]);
    }

    #[test]
    fn singletons_replaced_only_when_present() {
        let mut cfg = base();
        cfg.override_with(
            doc(json!({"dns": {}, "inboundDetour": []})),
            "override.json",
            &OverrideOptions::default(),
        );
        assert_eq!(cfg.log, base().log);
        assert!(cfg.dns.is_some());
        assert_eq!(cfg.inbound_detour, Some(vec![]));
        assert_eq!(cfg.inbounds, base().inbounds);
    }

    #[test]
    fn legacy_port_is_kept_from_base() {
        let mut cfg = doc(json!({
            "port": 1080,
            "inbounds": [{"protocol": "socks", "tag": "socks-in"}]
        }));
        cfg.override_with(
            doc(json!({"port": 2000})),
            "override.json",
            &OverrideOptions::default(),
        );
        assert_eq!(cfg.port, 1080);
    }
}

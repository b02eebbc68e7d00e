//! Routing rules and balancers (`routing`).

use serde::{Deserialize, Serialize};
use xconf_core::app::{Balancer, RouterApp, RoutingDomainStrategy, RoutingRule, RuleTarget};

use crate::common::{PortSpec, StringList, parse_networks};
use crate::error::{ConfigError, ResultExt};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub domain: StringList,
    pub ip: StringList,
    pub port: Option<PortSpec>,
    pub source_port: Option<PortSpec>,
    pub network: StringList,
    pub source: StringList,
    pub user: StringList,
    pub inbound_tag: StringList,
    pub protocol: StringList,
    pub outbound_tag: String,
    pub balancer_tag: String,
    pub rule_tag: String,
}

impl RuleConfig {
    pub fn build(&self) -> Result<RoutingRule, ConfigError> {
        if !self.kind.is_empty() && self.kind != "field" {
            return Err(ConfigError::unknown("routing rule type", &self.kind));
        }
        let target = match (self.outbound_tag.is_empty(), self.balancer_tag.is_empty()) {
            (false, true) => RuleTarget::Outbound(self.outbound_tag.clone()),
            (true, false) => RuleTarget::Balancer(self.balancer_tag.clone()),
            (false, false) => {
                return Err(ConfigError::Validation(
                    "both outboundTag and balancerTag are specified in routing rule".into(),
                ));
            }
            (true, true) => {
                return Err(ConfigError::Validation(
                    "neither outboundTag nor balancerTag is specified in routing rule".into(),
                ));
            }
        };
        Ok(RoutingRule {
            target,
            rule_tag: self.rule_tag.clone(),
            domains: self.domain.0.clone(),
            ips: self.ip.0.clone(),
            port_list: self.port.as_ref().map(PortSpec::build),
            source_port_list: self.source_port.as_ref().map(PortSpec::build),
            networks: parse_networks(&self.network)?,
            source_ips: self.source.0.clone(),
            users: self.user.0.clone(),
            inbound_tags: self.inbound_tag.0.clone(),
            protocols: self.protocol.0.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    pub tag: String,
    pub selector: StringList,
    pub strategy: StrategyConfig,
}

impl BalancerConfig {
    pub fn build(&self) -> Result<Balancer, ConfigError> {
        if self.tag.is_empty() {
            return Err(ConfigError::Validation("empty balancer tag".into()));
        }
        if self.selector.is_empty() {
            return Err(ConfigError::Validation(format!(
                "empty selector list in balancer {}",
                self.tag
            )));
        }
        let strategy = match self.strategy.kind.to_ascii_lowercase().as_str() {
            "" | "random" => "random",
            "leastping" => "leastPing",
            "roundrobin" => "roundRobin",
            _ => return Err(ConfigError::unknown("balancing strategy", &self.strategy.kind)),
        };
        Ok(Balancer {
            tag: self.tag.clone(),
            selector: self.selector.0.clone(),
            strategy: strategy.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterConfig {
    pub domain_strategy: String,
    pub rules: Vec<RuleConfig>,
    pub balancers: Vec<BalancerConfig>,
}

impl RouterConfig {
    pub fn build(&self) -> Result<RouterApp, ConfigError> {
        let domain_strategy = match self.domain_strategy.to_ascii_lowercase().as_str() {
            "" | "asis" => RoutingDomainStrategy::AsIs,
            "ipifnonmatch" => RoutingDomainStrategy::IpIfNonMatch,
            "ipondemand" => RoutingDomainStrategy::IpOnDemand,
            _ => return Err(ConfigError::unknown("routing domain strategy", &self.domain_strategy)),
        };
        let rules = self
            .rules
            .iter()
            .enumerate()
            .map(|(i, r)| r.build().with_context(|| format!("invalid routing rule #{i}")))
            .collect::<Result<_, _>>()?;
        let balancers = self
            .balancers
            .iter()
            .map(BalancerConfig::build)
            .collect::<Result<_, _>>()?;
        Ok(RouterApp {
            domain_strategy,
            rules,
            balancers,
        })
    }
}

//! Mesh configuration entries.
//!
//! Every entry has a [`Kind`] and a [`Spec`] payload. The two are carried
//! separately, as they are by the stores that supply them, so a reconciliation
//! must check that they agree before the payload is used.

use chrono::{offset::Utc, DateTime};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    RoutingRule,
    EdgeGateway,
    DestinationPolicy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMeta {
    pub kind: Kind,
    pub namespace: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(flatten)]
    pub meta: ConfigMeta,
    pub spec: Spec,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Spec {
    RoutingRule(RoutingRuleSpec),
    EdgeGateway(EdgeGatewaySpec),
    DestinationPolicy(DestinationPolicySpec),
}

/// Host-scoped HTTP routing. Rules are evaluated in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRuleSpec {
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub gateways: Vec<String>,
    #[serde(default)]
    pub http: Vec<HttpRouteRule>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteRule {
    pub name: String,
    #[serde(default)]
    pub matches: Vec<PathMatch>,
    #[serde(default)]
    pub destinations: Vec<RouteDestination>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathMatch {
    Exact(String),
    Prefix(String),
    Regex(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDestination {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default)]
    pub weight: u32,
}

/// Listeners exposed by an edge gateway.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeGatewaySpec {
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    #[serde(default)]
    pub servers: Vec<Server>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    #[serde(default)]
    pub name: String,
    pub port: ServerPort,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<ServerTls>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPort {
    pub number: u16,
    pub protocol: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTls {
    #[serde(default)]
    pub mode: TlsMode,
    #[serde(default)]
    pub credential_name: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TlsMode {
    Passthrough,
    #[default]
    Simple,
    Mutual,
}

/// Traffic policy applied to a destination host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationPolicySpec {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_policy: Option<TrafficPolicy>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<LoadBalancer>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadBalancer {
    RoundRobin,
    LeastConn,
    Random,
    Passthrough,
}

// === impl Kind ===

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::RoutingRule, Kind::EdgeGateway, Kind::DestinationPolicy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoutingRule => "routing-rule",
            Self::EdgeGateway => "edge-gateway",
            Self::DestinationPolicy => "destination-policy",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown configuration kind {0:?}; expected one of routing-rule, edge-gateway, destination-policy"
)]
pub struct UnknownKind(String);

// === impl ConfigEntry ===

impl ConfigEntry {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, spec: impl Into<Spec>) -> Self {
        let spec = spec.into();
        Self {
            meta: ConfigMeta {
                kind: spec.kind(),
                namespace: namespace.into(),
                name: name.into(),
                labels: BTreeMap::new(),
                creation_timestamp: None,
            },
            spec,
        }
    }

    pub fn kind(&self) -> Kind {
        self.meta.kind
    }

    pub fn namespace(&self) -> &str {
        &self.meta.namespace
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }
}

// === impl Spec ===

impl Spec {
    pub fn kind(&self) -> Kind {
        match self {
            Self::RoutingRule(_) => Kind::RoutingRule,
            Self::EdgeGateway(_) => Kind::EdgeGateway,
            Self::DestinationPolicy(_) => Kind::DestinationPolicy,
        }
    }
}

impl From<RoutingRuleSpec> for Spec {
    fn from(spec: RoutingRuleSpec) -> Self {
        Self::RoutingRule(spec)
    }
}

impl From<EdgeGatewaySpec> for Spec {
    fn from(spec: EdgeGatewaySpec) -> Self {
        Self::EdgeGateway(spec)
    }
}

impl From<DestinationPolicySpec> for Spec {
    fn from(spec: DestinationPolicySpec) -> Self {
        Self::DestinationPolicy(spec)
    }
}

// === impl HttpRouteRule ===

impl HttpRouteRule {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

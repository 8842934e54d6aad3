//! Routes and domains derived from ingress resources.
//!
//! These are recomputed every time the ingress source syncs. Entries that could
//! not be converted carry an error message and are kept, in the `invalid` half
//! of their collection, so that they remain visible to operators.

use chrono::{offset::Utc, DateTime};
use serde::{Deserialize, Serialize};

mod order;

pub use self::order::{is_canary, is_catch_all, sort_ingress_routes, RouteSorter, CANARY_SUFFIX};

/// Provides the routes and domains converted from ingress resources.
pub trait IngressStore {
    fn ingress_routes(&self) -> IngressRouteCollection;

    fn ingress_domains(&self) -> IngressDomainCollection;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    Exact,
    #[default]
    Prefix,
    #[serde(other)]
    Other,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestinationType {
    #[default]
    Single,
    Multiple,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendService {
    pub namespace: String,
    pub name: String,
    pub port: u32,
    #[serde(default)]
    pub weight: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRoute {
    pub name: String,
    pub host: String,
    #[serde(default)]
    pub path_type: PathType,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub destination_type: DestinationType,
    #[serde(default)]
    pub service_list: Vec<BackendService>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRouteCollection {
    pub valid: Vec<IngressRoute>,
    pub invalid: Vec<IngressRoute>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressDomain {
    pub host: String,

    /// HTTPS when the ingress configures TLS for this host.
    #[serde(default)]
    pub protocol: Protocol,

    /// Formatted as `{cluster}/{namespace}/{name}`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret_name: String,

    /// Creation time of the ingress resource that declared the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressDomainCollection {
    pub valid: Vec<IngressDomain>,
    pub invalid: Vec<IngressDomain>,
}

// === impl IngressRoute ===

impl IngressRoute {
    pub fn is_valid(&self) -> bool {
        self.error.is_empty()
    }
}

// === impl IngressRouteCollection ===

impl FromIterator<IngressRoute> for IngressRouteCollection {
    fn from_iter<I: IntoIterator<Item = IngressRoute>>(iter: I) -> Self {
        let (valid, invalid) = iter.into_iter().partition(IngressRoute::is_valid);
        Self { valid, invalid }
    }
}

impl IngressRouteCollection {
    /// Orders the valid routes by match priority.
    pub fn sort(&mut self) {
        sort_ingress_routes(&mut self.valid);
    }
}

// === impl IngressDomain ===

impl IngressDomain {
    pub fn is_valid(&self) -> bool {
        self.error.is_empty()
    }

    /// Splits `secret_name` into its cluster, namespace and name.
    pub fn secret_ref(&self) -> Option<(&str, &str, &str)> {
        let mut parts = self.secret_name.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(cluster), Some(ns), Some(name)) if !ns.is_empty() && !name.is_empty() => {
                Some((cluster, ns, name))
            }
            _ => None,
        }
    }
}

// === impl IngressDomainCollection ===

impl FromIterator<IngressDomain> for IngressDomainCollection {
    fn from_iter<I: IntoIterator<Item = IngressDomain>>(iter: I) -> Self {
        let (valid, invalid) = iter.into_iter().partition(IngressDomain::is_valid);
        Self { valid, invalid }
    }
}

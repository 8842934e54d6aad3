#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod config;
pub mod ingress;
mod name;

pub use self::{
    config::{ConfigEntry, ConfigMeta, Kind, Spec},
    ingress::{
        sort_ingress_routes, IngressDomain, IngressDomainCollection, IngressRoute,
        IngressRouteCollection, IngressStore, RouteSorter,
    },
    name::{canonical_name, is_auto_generated, strip_auto_generated_prefix, ClusterId},
};

/// The name of the ingress gateway. Configuration generated from ingress
/// resources is named `{INGRESS_GATEWAY_NAME}-{suffix}`.
pub const INGRESS_GATEWAY_NAME: &str = "istio-ingressgateway";

/// The cluster identifier used when none is configured. Names generated for
/// this cluster are not qualified with a cluster prefix.
pub const DEFAULT_CLUSTER_ID: &str = "Kubernetes";

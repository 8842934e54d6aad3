use ingress_merge_core::{
    canonical_name,
    config::{DestinationPolicySpec, EdgeGatewaySpec, RoutingRuleSpec},
    strip_auto_generated_prefix, ClusterId, Kind, Spec,
};

/// Describes how auto-generated configuration of one kind is reconciled with
/// authored configuration of the same kind.
pub trait MergePolicy {
    type Spec: Into<Spec>;

    const KIND: Kind;

    /// Extracts this kind's payload, returning the spec unchanged if it holds
    /// another kind.
    fn try_from_spec(spec: Spec) -> Result<Self::Spec, Spec>;

    /// The name an auto-generated entry is given in the output.
    fn canonical_name(auto_generated: &str, cluster: &ClusterId) -> String;

    /// Resolves a collision between an entry already in the output and an
    /// auto-generated entry with the same canonical name.
    fn resolve(existing: &mut Self::Spec, generated: Self::Spec) -> Resolution;
}

/// The outcome of a name collision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The auto-generated payload was folded into the existing entry.
    Merged,
    /// The auto-generated entry was discarded.
    Shadowed,
}

/// Routing rules from ingresses are appended after authored rules for the same
/// host, so they only match requests the authored rules do not.
#[derive(Copy, Clone, Debug, Default)]
pub struct RoutingRules;

/// Authored gateway listeners shadow ingress-derived ones entirely, including
/// their TLS settings.
#[derive(Copy, Clone, Debug, Default)]
pub struct EdgeGateways;

/// Authored traffic policy wins. Destination policy names are hashes of their
/// content, so they are never qualified with the cluster.
#[derive(Copy, Clone, Debug, Default)]
pub struct DestinationPolicies;

// === impl RoutingRules ===

impl MergePolicy for RoutingRules {
    type Spec = RoutingRuleSpec;

    const KIND: Kind = Kind::RoutingRule;

    fn try_from_spec(spec: Spec) -> Result<Self::Spec, Spec> {
        match spec {
            Spec::RoutingRule(spec) => Ok(spec),
            spec => Err(spec),
        }
    }

    fn canonical_name(auto_generated: &str, cluster: &ClusterId) -> String {
        canonical_name(auto_generated, cluster)
    }

    fn resolve(existing: &mut Self::Spec, generated: Self::Spec) -> Resolution {
        existing.http.extend(generated.http);
        Resolution::Merged
    }
}

// === impl EdgeGateways ===

impl MergePolicy for EdgeGateways {
    type Spec = EdgeGatewaySpec;

    const KIND: Kind = Kind::EdgeGateway;

    fn try_from_spec(spec: Spec) -> Result<Self::Spec, Spec> {
        match spec {
            Spec::EdgeGateway(spec) => Ok(spec),
            spec => Err(spec),
        }
    }

    fn canonical_name(auto_generated: &str, cluster: &ClusterId) -> String {
        canonical_name(auto_generated, cluster)
    }

    fn resolve(_: &mut Self::Spec, _: Self::Spec) -> Resolution {
        Resolution::Shadowed
    }
}

// === impl DestinationPolicies ===

impl MergePolicy for DestinationPolicies {
    type Spec = DestinationPolicySpec;

    const KIND: Kind = Kind::DestinationPolicy;

    fn try_from_spec(spec: Spec) -> Result<Self::Spec, Spec> {
        match spec {
            Spec::DestinationPolicy(spec) => Ok(spec),
            spec => Err(spec),
        }
    }

    fn canonical_name(auto_generated: &str, _: &ClusterId) -> String {
        strip_auto_generated_prefix(auto_generated).to_string()
    }

    fn resolve(_: &mut Self::Spec, _: Self::Spec) -> Resolution {
        Resolution::Shadowed
    }
}

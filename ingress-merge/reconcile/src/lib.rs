//! Reconciles authored mesh configuration with configuration generated from
//! ingress resources.
//!
//! The config store holds two sets of entries for each kind: entries written
//! by operators and entries converted from ingresses, which are named
//! `istio-ingressgateway-{suffix}`. Each generated entry is renamed to the
//! name an operator would have given it (see [`MergePolicy::canonical_name`])
//! and, if an authored entry already has that name, the kind's policy decides
//! how the two are combined:
//!
//! ```text
//! routing-rule        authored rules, then generated rules
//! edge-gateway        authored entry only
//! destination-policy  authored entry only
//! ```
//!
//! Generated entries without an authored counterpart are admitted under their
//! canonical name. Inputs are consumed; nothing the caller still holds is
//! modified.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod error;
mod policy;
#[cfg(test)]
mod tests;

pub use self::{
    error::ReconcileError,
    policy::{DestinationPolicies, EdgeGateways, MergePolicy, Resolution, RoutingRules},
};
use ahash::AHashMap as HashMap;
use ingress_merge_core::{is_auto_generated, ClusterId, ConfigEntry, ConfigMeta, Kind};
use tracing::{debug, info, warn};

/// Reconciles configuration for a single cluster.
#[derive(Clone, Debug, Default)]
pub struct Reconciler {
    cluster: ClusterId,
    scope: NameScope,
}

/// Determines which entries are considered to have the same name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NameScope {
    /// Names collide only within a namespace.
    #[default]
    Namespace,
    /// Names collide across namespaces.
    Cluster,
}

/// The result of reconciling one kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// At most one entry per name, ordered by namespace and name.
    pub entries: Vec<ConfigEntry>,

    /// Entries that were left out of the output.
    pub errors: Vec<ReconcileError>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Key {
    namespace: Option<String>,
    name: String,
}

#[derive(Debug)]
struct Typed<S> {
    meta: ConfigMeta,
    spec: S,
}

pub fn reconcile_routing_rules(
    cluster: &ClusterId,
    entries: impl IntoIterator<Item = ConfigEntry>,
) -> Reconciled {
    Reconciler::new(cluster.clone()).reconcile::<RoutingRules>(entries)
}

pub fn reconcile_edge_gateways(
    cluster: &ClusterId,
    entries: impl IntoIterator<Item = ConfigEntry>,
) -> Reconciled {
    Reconciler::new(cluster.clone()).reconcile::<EdgeGateways>(entries)
}

pub fn reconcile_destination_policies(
    cluster: &ClusterId,
    entries: impl IntoIterator<Item = ConfigEntry>,
) -> Reconciled {
    Reconciler::new(cluster.clone()).reconcile::<DestinationPolicies>(entries)
}

// === impl Reconciler ===

impl Reconciler {
    pub fn new(cluster: ClusterId) -> Self {
        Self {
            cluster,
            scope: NameScope::default(),
        }
    }

    pub fn with_scope(self, scope: NameScope) -> Self {
        Self { scope, ..self }
    }

    pub fn cluster(&self) -> &ClusterId {
        &self.cluster
    }

    /// Reconciles entries of the given kind with that kind's merge policy.
    pub fn reconcile_kind(
        &self,
        kind: Kind,
        entries: impl IntoIterator<Item = ConfigEntry>,
    ) -> Reconciled {
        match kind {
            Kind::RoutingRule => self.reconcile::<RoutingRules>(entries),
            Kind::EdgeGateway => self.reconcile::<EdgeGateways>(entries),
            Kind::DestinationPolicy => self.reconcile::<DestinationPolicies>(entries),
        }
    }

    pub fn reconcile<P: MergePolicy>(
        &self,
        entries: impl IntoIterator<Item = ConfigEntry>,
    ) -> Reconciled {
        let mut errors = Vec::new();
        let mut index = HashMap::<Key, Typed<P::Spec>>::new();
        let mut generated = Vec::new();

        for ConfigEntry { meta, spec } in entries {
            let found = spec.kind();
            let spec = match P::try_from_spec(spec) {
                Ok(spec) if meta.kind == P::KIND => spec,
                _ => {
                    warn!(
                        namespace = %meta.namespace,
                        name = %meta.name,
                        declared = %meta.kind,
                        %found,
                        expected = %P::KIND,
                        "Skipping entry with mismatched kind"
                    );
                    errors.push(ReconcileError::InvalidSpecKind {
                        namespace: meta.namespace,
                        name: meta.name,
                        expected: P::KIND,
                        declared: meta.kind,
                        found,
                    });
                    continue;
                }
            };

            let entry = Typed { meta, spec };
            if is_auto_generated(&entry.meta.name) {
                generated.push(entry);
            } else {
                // A later authored entry with the same name replaces an earlier one.
                let key = self.key(&entry.meta.namespace, &entry.meta.name);
                if index.insert(key, entry).is_some() {
                    debug!(kind = %P::KIND, "Replaced duplicate authored entry");
                }
            }
        }

        info!(
            kind = %P::KIND,
            cluster = %self.cluster,
            authored = index.len(),
            generated = generated.len(),
            "Reconciling auto-generated configuration"
        );

        for Typed { mut meta, spec } in generated {
            let name = P::canonical_name(&meta.name, &self.cluster);
            let key = self.key(&meta.namespace, &name);
            match index.get_mut(&key) {
                Some(existing) => {
                    let resolution = P::resolve(&mut existing.spec, spec);
                    debug!(
                        kind = %P::KIND,
                        namespace = %meta.namespace,
                        generated = %meta.name,
                        %name,
                        ?resolution,
                        "Resolved name collision"
                    );
                }
                None => {
                    debug!(
                        kind = %P::KIND,
                        namespace = %meta.namespace,
                        generated = %meta.name,
                        %name,
                        "Admitting auto-generated entry"
                    );
                    meta.name = name;
                    index.insert(key, Typed { meta, spec });
                }
            }
        }

        let mut entries = index
            .into_values()
            .map(|Typed { meta, spec }| ConfigEntry {
                meta,
                spec: spec.into(),
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| {
            a.namespace()
                .cmp(b.namespace())
                .then_with(|| a.name().cmp(b.name()))
        });

        Reconciled { entries, errors }
    }

    fn key(&self, namespace: &str, name: &str) -> Key {
        let namespace = match self.scope {
            NameScope::Namespace => Some(namespace.to_string()),
            NameScope::Cluster => None,
        };
        Key {
            namespace,
            name: name.to_string(),
        }
    }
}

// === impl Reconciled ===

impl Reconciled {
    pub fn get(&self, namespace: &str, name: &str) -> Option<&ConfigEntry> {
        self.entries
            .iter()
            .find(|e| e.namespace() == namespace && e.name() == name)
    }
}

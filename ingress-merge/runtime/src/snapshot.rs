use anyhow::{Context, Result};
use ingress_merge_core::{ConfigEntry, IngressDomain, IngressRoute, Kind};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Configuration and ingress state captured from a cluster.
///
/// Snapshots are YAML documents (JSON is accepted as well):
///
/// ```yaml
/// configs:
///   - kind: routing-rule
///     namespace: test
///     name: istio-ingressgateway-test-com
///     spec:
///       routing-rule:
///         http:
///           - name: route-2
/// ingressRoutes:
///   - name: default-test
///     host: test.com
///     pathType: prefix
///     path: /
/// ingressDomains:
///   - host: test.com
///     protocol: HTTPS
///     secretName: Kubernetes/default/test-cert
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub configs: Vec<ConfigEntry>,

    #[serde(default)]
    pub ingress_routes: Vec<IngressRoute>,

    #[serde(default)]
    pub ingress_domains: Vec<IngressDomain>,
}

// === impl Snapshot ===

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid snapshot {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).map_err(Into::into)
    }

    /// Returns the entries that declare the given kind, in snapshot order.
    pub fn configs_of(&self, kind: Kind) -> Vec<ConfigEntry> {
        self.configs
            .iter()
            .filter(|c| c.kind() == kind)
            .cloned()
            .collect()
    }
}

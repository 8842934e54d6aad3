use crate::{DEFAULT_CLUSTER_ID, INGRESS_GATEWAY_NAME};
use std::{convert::Infallible, fmt, str::FromStr};

/// Identifies the cluster whose configuration is being reconciled.
///
/// An empty identifier and [`DEFAULT_CLUSTER_ID`] both denote the default
/// cluster, for which canonical names are left unqualified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClusterId(String);

/// Returns true if the named configuration was generated from an ingress
/// resource rather than authored directly.
///
/// The dash after the gateway name is part of the prefix, so a name such as
/// `istio-ingressgatewayfoo` is authored and every generated name loses
/// exactly the prefix when it is canonicalized.
pub fn is_auto_generated(name: &str) -> bool {
    name.strip_prefix(INGRESS_GATEWAY_NAME)
        .is_some_and(|rest| rest.starts_with('-'))
}

/// Removes the `{INGRESS_GATEWAY_NAME}-` prefix, if present.
pub fn strip_auto_generated_prefix(name: &str) -> &str {
    name.strip_prefix(INGRESS_GATEWAY_NAME)
        .and_then(|rest| rest.strip_prefix('-'))
        .unwrap_or(name)
}

/// Computes the name an auto-generated resource takes once it is merged with
/// authored configuration.
///
/// ```
/// use ingress_merge_core::{canonical_name, ClusterId};
///
/// let cluster = ClusterId::new("gw-123-istio");
/// assert_eq!(
///     canonical_name("istio-ingressgateway-test-com", &cluster),
///     "gw-123-istio-test-com",
/// );
/// assert_eq!(
///     canonical_name("istio-ingressgateway-test-com", &ClusterId::default()),
///     "test-com",
/// );
/// ```
pub fn canonical_name(auto_generated: &str, cluster: &ClusterId) -> String {
    let stripped = strip_auto_generated_prefix(auto_generated);
    if cluster.is_default() {
        return stripped.to_string();
    }
    format!("{}-{}", cluster.0, stripped)
}

// === impl ClusterId ===

impl ClusterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0.is_empty() || self.0 == DEFAULT_CLUSTER_ID
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return DEFAULT_CLUSTER_ID.fmt(f);
        }
        self.0.fmt(f)
    }
}

impl FromStr for ClusterId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for ClusterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ClusterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

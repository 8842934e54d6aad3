use crate::Snapshot;
use ingress_merge_core::{
    IngressDomain, IngressDomainCollection, IngressRoute, IngressRouteCollection, IngressStore,
};

/// Serves the ingress routes and domains captured in a snapshot.
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore {
    routes: Vec<IngressRoute>,
    domains: Vec<IngressDomain>,
}

// === impl SnapshotStore ===

impl SnapshotStore {
    pub fn new(routes: Vec<IngressRoute>, domains: Vec<IngressDomain>) -> Self {
        Self { routes, domains }
    }
}

impl From<&Snapshot> for SnapshotStore {
    fn from(snapshot: &Snapshot) -> Self {
        Self::new(
            snapshot.ingress_routes.clone(),
            snapshot.ingress_domains.clone(),
        )
    }
}

impl IngressStore for SnapshotStore {
    /// Valid routes are returned in match-priority order.
    fn ingress_routes(&self) -> IngressRouteCollection {
        let mut routes = self.routes.iter().cloned().collect::<IngressRouteCollection>();
        routes.sort();
        routes
    }

    /// Domains are returned oldest first; domains without a creation time
    /// follow those with one.
    fn ingress_domains(&self) -> IngressDomainCollection {
        let mut domains = self.domains.clone();
        domains.sort_by(|a, b| match (&a.creation_time, &b.creation_time) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        domains.into_iter().collect()
    }
}

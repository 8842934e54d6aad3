use super::{IngressRoute, PathType};
use std::cmp::Ordering;

/// Routes whose name ends with this suffix are canary variants of another
/// route.
pub const CANARY_SUFFIX: &str = "canary";

pub type RoutePredicate = fn(&IngressRoute) -> bool;

/// Orders ingress routes so that the most specific match comes first.
///
/// Routes are compared by, in order:
///
/// 1. catch-all routes (by default `prefix` matches on `/`) sort after all others;
/// 2. longer hosts sort first;
/// 3. `exact` paths sort before `prefix` paths, which sort before any other path type;
/// 4. longer paths sort first;
/// 5. canary routes sort after their primary route.
///
/// Routes that compare equal keep their relative input order, so callers may
/// encode additional precedence (e.g. resource age) in the order of the input.
#[derive(Clone, Debug)]
pub struct RouteSorter<C = RoutePredicate, K = RoutePredicate> {
    is_catch_all: C,
    is_canary: K,
}

/// Sorts routes with the default catch-all and canary conventions.
pub fn sort_ingress_routes(routes: &mut [IngressRoute]) {
    <RouteSorter>::default().sort(routes)
}

/// Matches any path under a host.
pub fn is_catch_all(route: &IngressRoute) -> bool {
    route.path_type == PathType::Prefix && route.path == "/"
}

pub fn is_canary(route: &IngressRoute) -> bool {
    route.name.ends_with(CANARY_SUFFIX)
}

// === impl RouteSorter ===

impl Default for RouteSorter {
    fn default() -> Self {
        Self::new(is_catch_all, is_canary)
    }
}

impl<C, K> RouteSorter<C, K>
where
    C: Fn(&IngressRoute) -> bool,
    K: Fn(&IngressRoute) -> bool,
{
    pub fn new(is_catch_all: C, is_canary: K) -> Self {
        Self {
            is_catch_all,
            is_canary,
        }
    }

    /// Stable in-place sort by match priority.
    pub fn sort(&self, routes: &mut [IngressRoute]) {
        routes.sort_by(|a, b| self.compare(a, b));
    }

    pub fn compare(&self, a: &IngressRoute, b: &IngressRoute) -> Ordering {
        // `false` orders before `true`, demoting catch-all and canary routes.
        let by_catch_all = (self.is_catch_all)(a).cmp(&(self.is_catch_all)(b));
        by_catch_all
            .then_with(|| b.host.len().cmp(&a.host.len()))
            .then_with(|| path_type_rank(a.path_type).cmp(&path_type_rank(b.path_type)))
            .then_with(|| b.path.len().cmp(&a.path.len()))
            .then_with(|| (self.is_canary)(a).cmp(&(self.is_canary)(b)))
    }
}

fn path_type_rank(path_type: PathType) -> u8 {
    match path_type {
        PathType::Exact => 0,
        PathType::Prefix => 1,
        PathType::Other => 2,
    }
}

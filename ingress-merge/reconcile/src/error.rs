use ingress_merge_core::Kind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// The entry's declared kind or spec payload does not match the kind being
    /// reconciled. The entry is left out of the output.
    #[error("{namespace}/{name}: expected {expected}, found {declared} with {found} spec")]
    InvalidSpecKind {
        namespace: String,
        name: String,
        expected: Kind,
        declared: Kind,
        found: Kind,
    },
}

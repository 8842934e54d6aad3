#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use ingress_merge_core as core;
pub use ingress_merge_reconcile as reconcile;

mod args;
mod snapshot;
mod store;

pub use self::{args::Args, snapshot::Snapshot, store::SnapshotStore};

use crate::{
    core::{
        ClusterId, ConfigEntry, IngressDomainCollection, IngressRouteCollection, IngressStore,
        Kind,
    },
    reconcile::{NameScope, Reconciler},
    Snapshot, SnapshotStore,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};
use tracing::info;

#[derive(Debug, Parser)]
#[clap(
    name = "ingress-merge",
    about = "Reconciles ingress-generated mesh configuration with authored configuration"
)]
pub struct Args {
    #[clap(long, default_value = "warn", env = "INGRESS_MERGE_LOG")]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    /// The cluster whose configuration is being reconciled. Names generated
    /// from ingresses are qualified with it unless it is `Kubernetes`.
    #[clap(long, default_value = "Kubernetes", env = "CLUSTER_ID")]
    cluster_id: ClusterId,

    /// Treat names as unique across namespaces when matching generated
    /// configuration with authored configuration.
    #[clap(long)]
    cluster_scoped_names: bool,

    /// Write results to this file instead of stdout, which is shared with logs.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merges the snapshot's configuration entries.
    Reconcile {
        /// Reconcile only this kind. All kinds are reconciled by default.
        #[clap(long)]
        kind: Option<Kind>,

        snapshot: PathBuf,
    },

    /// Lists the snapshot's ingress routes in match-priority order, along with
    /// its ingress domains.
    Routes { snapshot: PathBuf },
}

#[derive(Debug, Serialize)]
struct ReconcileOutput {
    cluster: String,
    results: Vec<KindOutput>,
}

#[derive(Debug, Serialize)]
struct KindOutput {
    kind: Kind,
    entries: Vec<ConfigEntry>,
    errors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RoutesOutput {
    routes: IngressRouteCollection,
    domains: IngressDomainCollection,
}

// === impl Args ===

impl Args {
    #[inline]
    pub fn parse_and_run() -> Result<()> {
        Self::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            cluster_id,
            cluster_scoped_names,
            output,
            command,
        } = self;

        log_format.try_init(log_level)?;

        let reconciler = reconciler(cluster_id, cluster_scoped_names);
        match output {
            Some(path) => {
                let file = fs::File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                command.execute(&reconciler, io::BufWriter::new(file))
            }
            None => command.execute(&reconciler, io::stdout().lock()),
        }
    }

    /// Runs the command without configuring logging, writing JSON results to
    /// `out`.
    pub fn execute(self, out: impl Write) -> Result<()> {
        let Self {
            cluster_id,
            cluster_scoped_names,
            command,
            ..
        } = self;
        command.execute(&reconciler(cluster_id, cluster_scoped_names), out)
    }
}

fn reconciler(cluster_id: ClusterId, cluster_scoped_names: bool) -> Reconciler {
    let scope = if cluster_scoped_names {
        NameScope::Cluster
    } else {
        NameScope::Namespace
    };
    Reconciler::new(cluster_id).with_scope(scope)
}

// === impl Command ===

impl Command {
    fn execute(self, reconciler: &Reconciler, mut out: impl Write) -> Result<()> {
        match self {
            Self::Reconcile { kind, snapshot } => {
                let snapshot = Snapshot::load(&snapshot)?;
                let kinds = kind.map(|k| vec![k]).unwrap_or_else(|| Kind::ALL.to_vec());
                let results = kinds
                    .into_iter()
                    .map(|kind| {
                        let reconciled = reconciler.reconcile_kind(kind, snapshot.configs_of(kind));
                        info!(
                            %kind,
                            entries = reconciled.entries.len(),
                            errors = reconciled.errors.len(),
                            "Reconciled"
                        );
                        KindOutput {
                            kind,
                            entries: reconciled.entries,
                            errors: reconciled.errors.iter().map(ToString::to_string).collect(),
                        }
                    })
                    .collect();

                let output = ReconcileOutput {
                    cluster: reconciler.cluster().to_string(),
                    results,
                };
                serde_json::to_writer_pretty(&mut out, &output)?;
            }

            Self::Routes { snapshot } => {
                let snapshot = Snapshot::load(&snapshot)?;
                let store = SnapshotStore::from(&snapshot);
                let output = RoutesOutput {
                    routes: store.ingress_routes(),
                    domains: store.ingress_domains(),
                };
                info!(
                    valid = output.routes.valid.len(),
                    invalid = output.routes.invalid.len(),
                    "Sorted ingress routes"
                );
                serde_json::to_writer_pretty(&mut out, &output)?;
            }
        }

        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

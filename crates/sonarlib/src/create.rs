use std::io::Write;

use crate::cluster::Cluster;
use crate::error::ApiError;
use crate::resources::{self, Manifest, OutputFormat, ResourceKind};
use crate::workload::WorkloadSpec;

/// What happened to one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
    Failed(String),
    Printed,
}

/// Per-resource outcomes, in the order the resources were processed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateReport {
    pub outcomes: Vec<(ResourceKind, String, CreateOutcome)>,
}

impl CreateReport {
    /// Kinds which were newly created by this run.
    pub fn created(&self) -> Vec<ResourceKind> {
        self.outcomes
            .iter()
            .filter(|(_, _, outcome)| *outcome == CreateOutcome::Created)
            .map(|(kind, _, _)| *kind)
            .collect()
    }

    pub fn failed(&self) -> Vec<ResourceKind> {
        self.outcomes
            .iter()
            .filter(|(_, _, outcome)| matches!(outcome, CreateOutcome::Failed(_)))
            .map(|(kind, _, _)| *kind)
            .collect()
    }
}

/// Create every resource the spec asks for, in dependency order.
///
/// With `dry_run` each manifest is written to `out` instead, as by [`print`],
/// and nothing is sent to the cluster.  A resource which already exists is
/// left alone, and any other failure is logged and does not stop the
/// remaining resources from being created.  Nothing is rolled back: running
/// again picks up where this left off.
pub async fn run<C: Cluster, W: Write>(
    cluster: &C,
    spec: &WorkloadSpec,
    format: OutputFormat,
    out: &mut W,
) -> CreateReport {
    if spec.dry_run {
        return print(spec, format, out);
    }

    let mut report = CreateReport::default();
    for manifest in resources::build_all(spec) {
        let outcome = submit(cluster, &manifest).await;
        report
            .outcomes
            .push((manifest.kind(), manifest.qualified_name(), outcome));
    }

    let created = report.created();
    if created.is_empty() {
        tracing::info!("no resources were created");
    } else {
        tracing::info!("resources created: {}", join_kinds(&created));
    }

    report
}

/// Write every manifest the spec asks for to `out`, in creation order,
/// without touching a cluster.
pub fn print<W: Write>(spec: &WorkloadSpec, format: OutputFormat, out: &mut W) -> CreateReport {
    tracing::info!("dry-run is set, printing resources instead of creating them");

    let mut report = CreateReport::default();
    for manifest in resources::build_all(spec) {
        let outcome = print_one(&manifest, format, out);
        report
            .outcomes
            .push((manifest.kind(), manifest.qualified_name(), outcome));
    }

    report
}

///////////////////////////////////////////////////////////////////////////////

async fn submit<C: Cluster>(cluster: &C, manifest: &Manifest) -> CreateOutcome {
    let kind = manifest.kind();
    let name = manifest.qualified_name();

    match cluster.create(manifest).await {
        Ok(()) => {
            tracing::info!(%kind, %name, "created");
            CreateOutcome::Created
        }
        Err(ApiError::AlreadyExists) => {
            tracing::info!(%kind, %name, "already exists, skipping creation");
            CreateOutcome::AlreadyExists
        }
        Err(error) => {
            tracing::warn!(%kind, %name, %error, "creation failed");
            CreateOutcome::Failed(error.to_string())
        }
    }
}

fn print_one<W: Write>(manifest: &Manifest, format: OutputFormat, out: &mut W) -> CreateOutcome {
    let kind = manifest.kind();
    let name = manifest.qualified_name();

    let rendered = match manifest.render(format) {
        Ok(rendered) => rendered,
        Err(error) => {
            tracing::warn!(%kind, %name, %error, "could not render");
            return CreateOutcome::Failed(error.to_string());
        }
    };

    match out.write_all(rendered.as_bytes()) {
        Ok(()) => CreateOutcome::Printed,
        Err(error) => {
            tracing::warn!(%kind, %name, %error, "could not print");
            CreateOutcome::Failed(error.to_string())
        }
    }
}

pub(crate) fn join_kinds(kinds: &[ResourceKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

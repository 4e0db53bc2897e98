use crate::cluster::Cluster;
use crate::create::join_kinds;
use crate::error::ApiError;
use crate::identity::Identity;
use crate::prompt::Confirm;
use crate::resources::ResourceKind;

/// The pod security policy bundle, in the order it must be deleted: a binding
/// goes before the role it references, and the role before the policy.
pub static ACCESS_POLICY_DELETION_ORDER: [ResourceKind; 3] = [
    ResourceKind::ClusterRoleBinding,
    ResourceKind::ClusterRole,
    ResourceKind::PodSecurityPolicy,
];

/// What the delete flow did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Kinds which were deleted, in order.
    pub deleted: Vec<ResourceKind>,
    /// Kinds which the user chose not to delete.
    pub skipped: Vec<ResourceKind>,
}

/// Delete every resource belonging to the identity.
///
/// The deployment and service account are deleted by name.  The pod security
/// policy bundle and network policy are optional, and nothing records
/// whether they were created, so they are discovered by listing with the
/// identity's labels.
///
/// Unless `force` is set, `confirm` is asked about each resource first.  A
/// resource which does not exist is skipped, and any other failure is logged
/// and does not stop the remaining deletions.
pub async fn run<C: Cluster, P: Confirm>(
    cluster: &C,
    identity: &Identity,
    force: bool,
    confirm: &mut P,
) -> DeleteReport {
    let mut deleter = Deleter {
        cluster,
        identity,
        force,
        confirm,
        report: DeleteReport::default(),
    };

    if force {
        tracing::info!("force is set, not asking for confirmation before deleting resources");
    }

    // first, so the running container goes away promptly
    deleter.delete(ResourceKind::Deployment, &identity.name).await;

    for kind in ACCESS_POLICY_DELETION_ORDER {
        for name in deleter.discover(kind).await {
            deleter.delete(kind, &name).await;
        }
    }

    for name in deleter.discover(ResourceKind::NetworkPolicy).await {
        deleter.delete(ResourceKind::NetworkPolicy, &name).await;
    }

    // last, as the other resources may reference it
    deleter.delete(ResourceKind::ServiceAccount, &identity.name).await;

    let report = deleter.report;
    if report.deleted.is_empty() {
        tracing::info!("no resources were deleted");
    } else {
        tracing::info!("resources deleted: {}", join_kinds(&report.deleted));
    }

    report
}

///////////////////////////////////////////////////////////////////////////////

struct Deleter<'a, C, P> {
    cluster: &'a C,
    identity: &'a Identity,
    force: bool,
    confirm: &'a mut P,
    report: DeleteReport,
}

impl<C: Cluster, P: Confirm> Deleter<'_, C, P> {
    /// Names of resources of this kind carrying the identity's labels and
    /// with exactly the name the identity gives that kind.
    async fn discover(&self, kind: ResourceKind) -> Vec<String> {
        let selector = self.identity.label_selector();
        match self
            .cluster
            .list(kind, &self.identity.namespace, &selector)
            .await
        {
            Ok(names) => {
                let wanted = self.identity.object_name(kind);
                let found: Vec<String> = names.into_iter().filter(|name| *name == wanted).collect();
                if found.is_empty() {
                    tracing::info!(%kind, %selector, "no matching resources found, skipping deletion");
                }
                found
            }
            Err(error) => {
                tracing::warn!(%kind, %selector, %error, "could not list resources");
                Vec::new()
            }
        }
    }

    async fn delete(&mut self, kind: ResourceKind, name: &str) {
        let qualified_name = kind.qualified_name(&self.identity.namespace, name);

        if !self.force && !self.confirm.confirm(kind, &qualified_name) {
            self.report.skipped.push(kind);
            return;
        }

        match self
            .cluster
            .delete(kind, &self.identity.namespace, name)
            .await
        {
            Ok(()) => {
                tracing::info!(%kind, name = %qualified_name, "deleted");
                self.report.deleted.push(kind);
            }
            Err(ApiError::NotFound) => {
                tracing::info!(%kind, name = %qualified_name, "not found, skipping deletion");
            }
            Err(error) => {
                tracing::warn!(%kind, name = %qualified_name, %error, "deletion failed");
            }
        }
    }
}

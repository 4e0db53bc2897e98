pub mod access;
pub mod deployment;
pub mod network;
pub mod service_account;
pub mod types;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::workload::WorkloadSpec;

// convenience re-exports
pub use crate::resources::types::{Manifest, OutputFormat, ResourceKind};

/// Build every resource the spec asks for, in the order they must be
/// created: the service account, then the pod security policy bundle, then
/// the network policy, and finally the deployment which depends on them.
pub fn build_all(spec: &WorkloadSpec) -> Vec<Manifest> {
    let mut manifests = vec![Manifest::ServiceAccount(service_account::build(spec))];

    if spec.pod_security_policy {
        manifests.push(Manifest::PodSecurityPolicy(access::pod_security_policy(
            spec,
        )));
        manifests.push(Manifest::ClusterRole(access::cluster_role(spec)));
        manifests.push(Manifest::ClusterRoleBinding(access::cluster_role_binding(
            spec,
        )));
    }

    if spec.network_policy {
        manifests.push(Manifest::NetworkPolicy(network::build(spec)));
    }

    manifests.push(Manifest::Deployment(deployment::build(spec)));
    manifests
}

/// Metadata shared by every resource: the name and labels, and the namespace
/// if the kind is namespaced.
fn metadata(spec: &WorkloadSpec, kind: ResourceKind) -> ObjectMeta {
    ObjectMeta {
        name: Some(spec.identity.object_name(kind)),
        namespace: kind.is_namespaced().then(|| spec.namespace().to_string()),
        labels: Some(spec.identity.labels.clone()),
        ..Default::default()
    }
}

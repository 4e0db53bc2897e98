#[cfg(test)]
pub mod fake;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::networking::v1::NetworkPolicy;
use k8s_openapi::api::policy::v1beta1::PodSecurityPolicy;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::{Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

use crate::error::ApiError;
use crate::resources::{Manifest, ResourceKind};

/// The operations the create and delete flows need from the cluster.
///
/// Implementations classify failures into [`ApiError`], so the flows never
/// deal with transport-specific errors.
#[allow(async_fn_in_trait)]
pub trait Cluster {
    /// Create a resource.  Fails with `AlreadyExists` if a resource of the
    /// same kind and name is already present.
    async fn create(&self, manifest: &Manifest) -> Result<(), ApiError>;

    /// Names of the resources of a kind matching a label selector.  The
    /// namespace is ignored for cluster-scoped kinds.
    async fn list(
        &self,
        kind: ResourceKind,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<String>, ApiError>;

    /// Delete a resource.  Fails with `NotFound` if it does not exist.
    async fn delete(&self, kind: ResourceKind, namespace: &str, name: &str)
        -> Result<(), ApiError>;
}

/// A real cluster, reached through the Kubernetes API.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn namespaced<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn cluster_wide<K>(&self) -> Api<K>
    where
        K: Resource,
        K::DynamicType: Default,
    {
        Api::all(self.client.clone())
    }
}

impl Cluster for KubeCluster {
    async fn create(&self, manifest: &Manifest) -> Result<(), ApiError> {
        let namespace = manifest.namespace().unwrap_or_default();
        match manifest {
            Manifest::ServiceAccount(r) => create_with(self.namespaced(&namespace), r).await,
            Manifest::PodSecurityPolicy(r) => create_with(self.cluster_wide(), r).await,
            Manifest::ClusterRole(r) => create_with(self.cluster_wide(), r).await,
            Manifest::ClusterRoleBinding(r) => create_with(self.cluster_wide(), r).await,
            Manifest::NetworkPolicy(r) => create_with(self.namespaced(&namespace), r).await,
            Manifest::Deployment(r) => create_with(self.namespaced(&namespace), r).await,
        }
    }

    async fn list(
        &self,
        kind: ResourceKind,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<String>, ApiError> {
        match kind {
            ResourceKind::ServiceAccount => {
                list_with::<ServiceAccount>(self.namespaced(namespace), label_selector).await
            }
            ResourceKind::PodSecurityPolicy => {
                list_with::<PodSecurityPolicy>(self.cluster_wide(), label_selector).await
            }
            ResourceKind::ClusterRole => {
                list_with::<ClusterRole>(self.cluster_wide(), label_selector).await
            }
            ResourceKind::ClusterRoleBinding => {
                list_with::<ClusterRoleBinding>(self.cluster_wide(), label_selector).await
            }
            ResourceKind::NetworkPolicy => {
                list_with::<NetworkPolicy>(self.namespaced(namespace), label_selector).await
            }
            ResourceKind::Deployment => {
                list_with::<Deployment>(self.namespaced(namespace), label_selector).await
            }
        }
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<(), ApiError> {
        match kind {
            ResourceKind::ServiceAccount => {
                delete_with::<ServiceAccount>(self.namespaced(namespace), name).await
            }
            ResourceKind::PodSecurityPolicy => {
                delete_with::<PodSecurityPolicy>(self.cluster_wide(), name).await
            }
            ResourceKind::ClusterRole => delete_with::<ClusterRole>(self.cluster_wide(), name).await,
            ResourceKind::ClusterRoleBinding => {
                delete_with::<ClusterRoleBinding>(self.cluster_wide(), name).await
            }
            ResourceKind::NetworkPolicy => {
                delete_with::<NetworkPolicy>(self.namespaced(namespace), name).await
            }
            ResourceKind::Deployment => {
                delete_with::<Deployment>(self.namespaced(namespace), name).await
            }
        }
    }
}

///////////////////////////////////////////////////////////////////////////////

async fn create_with<K>(api: Api<K>, resource: &K) -> Result<(), ApiError>
where
    K: Resource + Clone + Debug + DeserializeOwned + Serialize,
{
    api.create(&PostParams::default(), resource).await?;
    Ok(())
}

async fn list_with<K>(api: Api<K>, label_selector: &str) -> Result<Vec<String>, ApiError>
where
    K: Resource + Clone + Debug + DeserializeOwned,
{
    let list = api.list(&ListParams::default().labels(label_selector)).await?;
    Ok(list.items.iter().map(ResourceExt::name_any).collect())
}

/// Foreground propagation: dependents (eg, a deployment's replica sets) are
/// removed before the owner.
async fn delete_with<K>(api: Api<K>, name: &str) -> Result<(), ApiError>
where
    K: Resource + Clone + Debug + DeserializeOwned,
{
    api.delete(name, &DeleteParams::foreground()).await?;
    Ok(())
}

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::networking::v1::NetworkPolicy;
use k8s_openapi::api::policy::v1beta1::PodSecurityPolicy;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use kube::ResourceExt;
use serde::Serialize;
use std::fmt;

use crate::error::RenderError;

/// The kinds of resource which make up a debugging workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    ServiceAccount,
    PodSecurityPolicy,
    ClusterRole,
    ClusterRoleBinding,
    NetworkPolicy,
    Deployment,
}

impl ResourceKind {
    /// Cluster-scoped kinds ignore the namespace.
    pub fn is_namespaced(self) -> bool {
        match self {
            Self::ServiceAccount | Self::NetworkPolicy | Self::Deployment => true,
            Self::PodSecurityPolicy | Self::ClusterRole | Self::ClusterRoleBinding => false,
        }
    }

    /// `namespace/name` for namespaced kinds, `name` otherwise.
    pub fn qualified_name(self, namespace: &str, name: &str) -> String {
        if self.is_namespaced() {
            format!("{namespace}/{name}")
        } else {
            name.to_string()
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ServiceAccount => "serviceaccount",
            Self::PodSecurityPolicy => "podsecuritypolicy",
            Self::ClusterRole => "clusterrole",
            Self::ClusterRoleBinding => "clusterrolebinding",
            Self::NetworkPolicy => "networkpolicy",
            Self::Deployment => "deployment",
        };
        write!(f, "{s}")
    }
}

/// How to print a manifest instead of submitting it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// A fully-built resource, ready to submit or print.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Manifest {
    ServiceAccount(ServiceAccount),
    PodSecurityPolicy(PodSecurityPolicy),
    ClusterRole(ClusterRole),
    ClusterRoleBinding(ClusterRoleBinding),
    NetworkPolicy(NetworkPolicy),
    Deployment(Deployment),
}

impl Manifest {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::ServiceAccount(_) => ResourceKind::ServiceAccount,
            Self::PodSecurityPolicy(_) => ResourceKind::PodSecurityPolicy,
            Self::ClusterRole(_) => ResourceKind::ClusterRole,
            Self::ClusterRoleBinding(_) => ResourceKind::ClusterRoleBinding,
            Self::NetworkPolicy(_) => ResourceKind::NetworkPolicy,
            Self::Deployment(_) => ResourceKind::Deployment,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::ServiceAccount(r) => r.name_any(),
            Self::PodSecurityPolicy(r) => r.name_any(),
            Self::ClusterRole(r) => r.name_any(),
            Self::ClusterRoleBinding(r) => r.name_any(),
            Self::NetworkPolicy(r) => r.name_any(),
            Self::Deployment(r) => r.name_any(),
        }
    }

    /// The namespace, for namespaced kinds.
    pub fn namespace(&self) -> Option<String> {
        match self {
            Self::ServiceAccount(r) => r.namespace(),
            Self::NetworkPolicy(r) => r.namespace(),
            Self::Deployment(r) => r.namespace(),
            Self::PodSecurityPolicy(_) | Self::ClusterRole(_) | Self::ClusterRoleBinding(_) => None,
        }
    }

    pub fn qualified_name(&self) -> String {
        self.kind()
            .qualified_name(&self.namespace().unwrap_or_default(), &self.name())
    }

    /// Render as a YAML document (with a leading `---`, so several can be
    /// concatenated) or as pretty-printed JSON.
    pub fn render(&self, format: OutputFormat) -> Result<String, RenderError> {
        match format {
            OutputFormat::Yaml => Ok(format!("---\n{yaml}", yaml = serde_yaml::to_string(self)?)),
            OutputFormat::Json => Ok(format!("{json}\n", json = serde_json::to_string_pretty(self)?)),
        }
    }
}

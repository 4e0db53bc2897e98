use k8s_openapi::api::core::v1::ServiceAccount;

use crate::resources::{metadata, ResourceKind};
use crate::workload::WorkloadSpec;

/// The service account the debugging pod runs as.  The pod security policy
/// is bound to it.
pub fn build(spec: &WorkloadSpec) -> ServiceAccount {
    ServiceAccount {
        metadata: metadata(spec, ResourceKind::ServiceAccount),
        ..Default::default()
    }
}

use k8s_openapi::api::networking::v1::{
    NetworkPolicy, NetworkPolicyEgressRule, NetworkPolicyIngressRule, NetworkPolicySpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;

use crate::resources::{metadata, ResourceKind};
use crate::workload::WorkloadSpec;

/// A network policy which allows all ingress and egress traffic for the
/// debugging pod, for clusters which deny by default.
pub fn build(spec: &WorkloadSpec) -> NetworkPolicy {
    NetworkPolicy {
        metadata: metadata(spec, ResourceKind::NetworkPolicy),
        spec: Some(NetworkPolicySpec {
            pod_selector: LabelSelector {
                match_labels: Some(spec.identity.labels.clone()),
                ..Default::default()
            },
            // an empty rule matches all traffic
            ingress: Some(vec![NetworkPolicyIngressRule::default()]),
            egress: Some(vec![NetworkPolicyEgressRule::default()]),
            policy_types: Some(vec!["Ingress".to_string(), "Egress".to_string()]),
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tests::spec;
    use crate::workload::WorkloadOptions;

    #[test]
    fn allows_everything_for_the_pod() {
        let spec = spec(WorkloadOptions {
            network_policy: true,
            ..Default::default()
        });
        let np = build(&spec);
        let np_spec = np.spec.unwrap();

        assert_eq!(
            np_spec.pod_selector.match_labels.as_ref(),
            Some(&spec.identity.labels)
        );
        assert_eq!(np_spec.ingress, Some(vec![NetworkPolicyIngressRule::default()]));
        assert_eq!(np_spec.egress, Some(vec![NetworkPolicyEgressRule::default()]));
        assert_eq!(
            np_spec.policy_types,
            Some(vec!["Ingress".to_string(), "Egress".to_string()])
        );
    }
}

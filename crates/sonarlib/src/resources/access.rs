use k8s_openapi::api::policy::v1beta1::{
    FSGroupStrategyOptions, IDRange, PodSecurityPolicy, PodSecurityPolicySpec,
    RunAsGroupStrategyOptions, RunAsUserStrategyOptions, SELinuxStrategyOptions,
    SupplementalGroupsStrategyOptions,
};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, PolicyRule, RoleRef, Subject};

use crate::resources::{metadata, ResourceKind};
use crate::workload::WorkloadSpec;

/// Upper bound of the user and group ID ranges the policy permits.
pub static MAX_RUN_AS_ID: i64 = 65535;

/// API group of the cluster role and its binding.
pub static RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

/// A pod security policy permitting exactly what the debugging pod needs.
///
/// User, group, and filesystem group IDs must fall in the range starting at
/// the configured user ID.  Host namespaces are only permitted with
/// `node_exec`.
pub fn pod_security_policy(spec: &WorkloadSpec) -> PodSecurityPolicy {
    let ranges = Some(vec![IDRange {
        min: spec.run_as_user,
        max: MAX_RUN_AS_ID,
    }]);

    PodSecurityPolicy {
        metadata: metadata(spec, ResourceKind::PodSecurityPolicy),
        spec: Some(PodSecurityPolicySpec {
            allow_privilege_escalation: Some(spec.allow_privilege_escalation),
            fs_group: FSGroupStrategyOptions {
                rule: Some("MustRunAs".to_string()),
                ranges: ranges.clone(),
            },
            host_ipc: Some(spec.node_exec),
            host_network: Some(spec.node_exec),
            host_pid: Some(spec.node_exec),
            privileged: Some(spec.privileged),
            read_only_root_filesystem: Some(false),
            run_as_group: Some(RunAsGroupStrategyOptions {
                rule: "MustRunAs".to_string(),
                ranges: ranges.clone(),
            }),
            run_as_user: RunAsUserStrategyOptions {
                rule: "MustRunAs".to_string(),
                ranges,
            },
            se_linux: SELinuxStrategyOptions {
                rule: "RunAsAny".to_string(),
                ..Default::default()
            },
            supplemental_groups: SupplementalGroupsStrategyOptions {
                rule: Some("RunAsAny".to_string()),
                ..Default::default()
            },
            volumes: Some(vec!["*".to_string()]),
            ..Default::default()
        }),
    }
}

/// A cluster role granting `use` of the pod security policy, and nothing
/// else.
pub fn cluster_role(spec: &WorkloadSpec) -> ClusterRole {
    ClusterRole {
        metadata: metadata(spec, ResourceKind::ClusterRole),
        rules: Some(vec![PolicyRule {
            api_groups: Some(vec!["policy".to_string()]),
            resources: Some(vec!["podsecuritypolicies".to_string()]),
            resource_names: Some(vec![spec
                .identity
                .object_name(ResourceKind::PodSecurityPolicy)]),
            verbs: vec!["use".to_string()],
            ..Default::default()
        }]),
        ..Default::default()
    }
}

/// Bind the cluster role to the service account.
pub fn cluster_role_binding(spec: &WorkloadSpec) -> ClusterRoleBinding {
    ClusterRoleBinding {
        metadata: metadata(spec, ResourceKind::ClusterRoleBinding),
        role_ref: RoleRef {
            api_group: RBAC_API_GROUP.to_string(),
            kind: "ClusterRole".to_string(),
            name: spec.identity.object_name(ResourceKind::ClusterRole),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_string(),
            name: spec.name().to_string(),
            namespace: Some(spec.namespace().to_string()),
            ..Default::default()
        }]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tests::spec;
    use crate::workload::WorkloadOptions;

    #[test]
    fn id_ranges_start_at_the_user() {
        let spec = spec(WorkloadOptions {
            pod_security_policy: true,
            run_as_user: Some(1234),
            ..Default::default()
        });
        let psp_spec = pod_security_policy(&spec).spec.unwrap();
        let expected = Some(vec![IDRange {
            min: 1234,
            max: MAX_RUN_AS_ID,
        }]);

        assert_eq!(psp_spec.run_as_user.rule, "MustRunAs");
        assert_eq!(psp_spec.run_as_user.ranges, expected);
        assert_eq!(psp_spec.run_as_group.unwrap().ranges, expected);
        assert_eq!(psp_spec.fs_group.ranges, expected);
        assert_eq!(psp_spec.volumes, Some(vec!["*".to_string()]));
    }

    #[test]
    fn privilege_flags_carry_through() {
        let spec = spec(WorkloadOptions {
            pod_security_policy: true,
            privileged: true,
            allow_privilege_escalation: true,
            ..Default::default()
        });
        let psp_spec = pod_security_policy(&spec).spec.unwrap();

        assert_eq!(psp_spec.privileged, Some(true));
        assert_eq!(psp_spec.allow_privilege_escalation, Some(true));
        assert_eq!(psp_spec.host_pid, Some(false));
        assert_eq!(psp_spec.run_as_user.ranges.unwrap()[0].min, 0);
    }

    #[test]
    fn privileged_policy_permits_escalation() {
        let spec = spec(WorkloadOptions {
            pod_security_policy: true,
            privileged: true,
            ..Default::default()
        });
        let psp_spec = pod_security_policy(&spec).spec.unwrap();

        assert_eq!(psp_spec.privileged, Some(true));
        assert_eq!(psp_spec.allow_privilege_escalation, Some(true));
    }

    #[test]
    fn node_exec_permits_host_namespaces() {
        let spec = spec(WorkloadOptions {
            node_exec: true,
            node_name: Some("worker-1".to_string()),
            ..Default::default()
        });
        let psp_spec = pod_security_policy(&spec).spec.unwrap();

        assert_eq!(psp_spec.host_ipc, Some(true));
        assert_eq!(psp_spec.host_network, Some(true));
        assert_eq!(psp_spec.host_pid, Some(true));
        assert_eq!(psp_spec.privileged, Some(true));
    }

    #[test]
    fn role_only_uses_its_policy() {
        let spec = spec(WorkloadOptions::default());
        let rules = cluster_role(&spec).rules.unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].verbs, vec!["use"]);
        assert_eq!(rules[0].resource_names, Some(vec!["sonar-test.debug".to_string()]));
    }

    #[test]
    fn binding_references_role_and_account() {
        let spec = spec(WorkloadOptions::default());
        let crb = cluster_role_binding(&spec);

        assert_eq!(crb.role_ref.kind, "ClusterRole");
        assert_eq!(crb.role_ref.name, "sonar-test.debug");
        let subjects = crb.subjects.unwrap();
        assert_eq!(subjects[0].kind, "ServiceAccount");
        assert_eq!(subjects[0].name, "sonar-test");
        assert_eq!(subjects[0].namespace.as_deref(), Some("debug"));
    }
}

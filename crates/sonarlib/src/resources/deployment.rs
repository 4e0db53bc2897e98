use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, HostPathVolumeSource, PodSpec, PodTemplateSpec, ResourceRequirements,
    SecurityContext, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::BTreeMap;

use crate::resources::{metadata, ResourceKind};
use crate::workload::WorkloadSpec;

/// Name of the single container in the pod.
pub static CONTAINER_NAME: &str = "sonar";

/// Name of the volume holding the node's root filesystem.
pub static HOST_ROOT_VOLUME: &str = "host-root";

/// Where the node's root filesystem is mounted in the container.
pub static HOST_ROOT_MOUNT_PATH: &str = "/host";

/// A single-replica deployment running the debugging container.
///
/// With `node_exec` the pod shares the node's IPC, network, and PID
/// namespaces, and the node's root filesystem is mounted read-write at
/// `/host`.
pub fn build(spec: &WorkloadSpec) -> Deployment {
    let labels = spec.identity.labels.clone();

    let mut container = Container {
        name: CONTAINER_NAME.to_string(),
        image: Some(spec.image.clone()),
        command: non_empty(&spec.command),
        args: non_empty(&spec.args),
        resources: Some(ResourceRequirements {
            limits: Some(quantities(&[("cpu", "2"), ("memory", "250Mi")])),
            requests: Some(quantities(&[("cpu", "200m"), ("memory", "50Mi")])),
            ..Default::default()
        }),
        security_context: Some(SecurityContext {
            allow_privilege_escalation: Some(spec.allow_privilege_escalation),
            privileged: Some(spec.privileged),
            run_as_non_root: spec.non_root.then_some(true),
            run_as_user: Some(spec.run_as_user),
            run_as_group: Some(spec.run_as_group),
            ..Default::default()
        }),
        ..Default::default()
    };

    let mut pod_spec = PodSpec {
        restart_policy: Some("Always".to_string()),
        service_account_name: Some(spec.name().to_string()),
        node_name: spec.node_name.clone(),
        ..Default::default()
    };

    if spec.node_exec {
        pod_spec.host_ipc = Some(true);
        pod_spec.host_network = Some(true);
        pod_spec.host_pid = Some(true);
        pod_spec.volumes = Some(vec![Volume {
            name: HOST_ROOT_VOLUME.to_string(),
            host_path: Some(HostPathVolumeSource {
                path: "/".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }]);
        container.volume_mounts = Some(vec![VolumeMount {
            name: HOST_ROOT_VOLUME.to_string(),
            mount_path: HOST_ROOT_MOUNT_PATH.to_string(),
            read_only: Some(false),
            ..Default::default()
        }]);
    }

    pod_spec.containers = vec![container];

    Deployment {
        metadata: metadata(spec, ResourceKind::Deployment),
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(pod_spec),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn non_empty(words: &[String]) -> Option<Vec<String>> {
    if words.is_empty() {
        None
    } else {
        Some(words.to_vec())
    }
}

fn quantities(pairs: &[(&str, &str)]) -> BTreeMap<String, Quantity> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), Quantity((*v).to_string())))
        .collect()
}

use std::fmt::Display;
use std::process;

use sonarlib::cluster::KubeCluster;
use sonarlib::identity::Identity;
use sonarlib::kubeconfig::Loaded;
use sonarlib::EXIT_CODE_INITIALISE_FAILED;

use crate::GlobalArgs;

/// If error, log it and terminate.
pub fn or_exit<T, E: Display>(r: Result<T, E>) -> T {
    match r {
        Ok(t) => t,
        Err(error) => {
            tracing::error!(%error, "cannot continue, terminating...");
            process::exit(EXIT_CODE_INITIALISE_FAILED);
        }
    }
}

/// Validate the name and namespace, or die.  The kubeconfig is only read if
/// the namespace has to come from its context, and is returned so it doesn't
/// have to be read twice.
pub fn resolve_identity(global: &GlobalArgs) -> (Identity, Option<Loaded>) {
    let mut loaded = None;
    let identity = or_exit(Identity::resolve(
        global.name.as_deref(),
        global.namespace.as_deref(),
        || {
            let kubeconfig = global.kube.load()?;
            let namespace = kubeconfig.default_namespace();
            loaded = Some(kubeconfig);
            Ok(namespace)
        },
    ));

    tracing::info!(name = %identity.name, namespace = %identity.namespace, "resolved identity");
    (identity, loaded)
}

/// Build a client for the cluster, or die.
pub async fn connect(global: &GlobalArgs, loaded: Option<Loaded>) -> KubeCluster {
    let loaded = match loaded {
        Some(loaded) => loaded,
        None => or_exit(global.kube.load()),
    };

    KubeCluster::new(or_exit(loaded.client().await))
}

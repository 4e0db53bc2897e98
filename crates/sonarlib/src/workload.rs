use crate::error::ConfigError;
use crate::identity::Identity;

/// Tag given to images which don't specify one.
pub static DEFAULT_IMAGE_TAG: &str = "latest";

/// User and group the container runs as when not privileged and not otherwise
/// specified.
pub static DEFAULT_UNPRIVILEGED_ID: i64 = 1000;

/// Flags describing the workload, as supplied by the user.  Nothing here has
/// been validated.
#[derive(Clone, Debug, Default)]
pub struct WorkloadOptions {
    pub image: Option<String>,
    pub command: Option<String>,
    pub args: Option<String>,
    pub run_as_user: Option<i64>,
    pub run_as_group: Option<i64>,
    pub privileged: bool,
    pub allow_privilege_escalation: bool,
    pub non_root: bool,
    pub node_name: Option<String>,
    pub node_exec: bool,
    pub network_policy: bool,
    pub pod_security_policy: bool,
    pub dry_run: bool,
}

/// Everything needed to build the resources for a debugging workload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkloadSpec {
    pub identity: Identity,
    pub image: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub run_as_user: i64,
    pub run_as_group: i64,
    pub privileged: bool,
    pub allow_privilege_escalation: bool,
    pub non_root: bool,
    pub node_name: Option<String>,
    pub node_exec: bool,
    pub network_policy: bool,
    pub pod_security_policy: bool,
    pub dry_run: bool,
}

impl WorkloadSpec {
    /// Validate the options and fill in defaults.
    ///
    /// Running on a node's namespaces needs a pod security policy which
    /// permits it and a privileged container, and has no use for a network
    /// policy, so `node_exec` overrides those three flags.  A privileged
    /// container always allows privilege escalation.
    pub fn resolve(identity: Identity, options: WorkloadOptions) -> Result<Self, ConfigError> {
        let image = match options.image.as_deref().map(str::trim) {
            Some(image) if !image.is_empty() => normalise_image(image),
            _ => return Err(ConfigError::MissingImage),
        };

        let node_name = options.node_name.filter(|n| !n.is_empty());

        let mut network_policy = options.network_policy;
        let mut pod_security_policy = options.pod_security_policy;
        let mut privileged = options.privileged;
        if options.node_exec {
            if node_name.is_none() {
                return Err(ConfigError::MissingNodeName);
            }
            if network_policy {
                tracing::info!("node-exec is set, not creating a networkpolicy");
                network_policy = false;
            }
            if !pod_security_policy {
                tracing::info!("node-exec is set, creating a podsecuritypolicy");
                pod_security_policy = true;
            }
            if !privileged {
                tracing::info!("node-exec is set, running a privileged container");
                privileged = true;
            }
        }

        // the API server rejects a privileged container which can't escalate
        let mut allow_privilege_escalation = options.allow_privilege_escalation;
        if privileged && !allow_privilege_escalation {
            tracing::info!("privileged is set, allowing privilege escalation");
            allow_privilege_escalation = true;
        }

        let default_id = if privileged { 0 } else { DEFAULT_UNPRIVILEGED_ID };

        Ok(Self {
            identity,
            image,
            command: split_words(options.command.as_deref()),
            args: split_words(options.args.as_deref()),
            run_as_user: options.run_as_user.unwrap_or(default_id),
            run_as_group: options.run_as_group.unwrap_or(default_id),
            privileged,
            allow_privilege_escalation,
            non_root: options.non_root,
            node_name,
            node_exec: options.node_exec,
            network_policy,
            pod_security_policy,
            dry_run: options.dry_run,
        })
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn namespace(&self) -> &str {
        &self.identity.namespace
    }
}

/// Append the default tag to an image reference which has neither a tag nor a
/// digest.  A `:` before the last `/` is a registry port, not a tag.
pub fn normalise_image(image: &str) -> String {
    if image.contains('@') {
        return image.to_string();
    }

    let last_segment = image.rsplit('/').next().unwrap_or(image);
    if last_segment.contains(':') {
        image.to_string()
    } else {
        format!("{image}:{DEFAULT_IMAGE_TAG}")
    }
}

/// Split on whitespace.  There is no shell quoting.
fn split_words(s: Option<&str>) -> Vec<String> {
    s.map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

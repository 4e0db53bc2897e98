use std::io;

use sonarlib::resources::OutputFormat;
use sonarlib::workload::{WorkloadOptions, WorkloadSpec};

use crate::defaults::Defaults;
use crate::util::*;
use crate::GlobalArgs;

#[derive(Clone, Debug, Default, clap::Args)]
pub struct CreateArgs {
    /// Image to run, eg `glitchcrab/ubuntu-debug`.  If no tag is given,
    /// `latest` is used.
    #[arg(short = 'i', long = "image", env = "SONAR_IMAGE")]
    pub image: Option<String>,

    /// Command to override the entrypoint with.  Split on whitespace.
    #[arg(long = "command")]
    pub pod_command: Option<String>,

    /// Arguments to the command.  Split on whitespace.
    #[arg(long = "args", allow_hyphen_values = true)]
    pub pod_args: Option<String>,

    /// User ID to run as.  Defaults to 0 if privileged, 1000 otherwise.
    #[arg(long = "user")]
    pub user: Option<i64>,

    /// Group ID to run as.  Defaults to 0 if privileged, 1000 otherwise.
    #[arg(long = "group")]
    pub group: Option<i64>,

    /// Run a privileged container.
    #[arg(long)]
    pub privileged: bool,

    /// Allow the container to gain more privileges than its parent process.
    #[arg(long)]
    pub allow_privilege_escalation: bool,

    /// Require the container to run as a non-root user.
    #[arg(long)]
    pub non_root: bool,

    /// Name of the node to run on.
    #[arg(long)]
    pub node_name: Option<String>,

    /// Share the node's IPC, network, and PID namespaces and mount its root
    /// filesystem at `/host`.  Requires `--node-name`, and implies
    /// `--pod-security-policy` and `--privileged`.
    #[arg(long)]
    pub node_exec: bool,

    /// Create a NetworkPolicy allowing all traffic to and from the pod.
    #[arg(long)]
    pub network_policy: bool,

    /// Create a PodSecurityPolicy, and a ClusterRole and ClusterRoleBinding
    /// granting it to the pod.
    #[arg(long, alias = "podsecuritypolicy")]
    pub pod_security_policy: bool,

    /// Print the resources instead of creating them.
    #[arg(long)]
    pub dry_run: bool,

    /// Format to print resources in with `--dry-run`.
    #[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,
}

impl CreateArgs {
    /// Combine with the defaults file.  Flags can switch features on, but
    /// not off.
    pub fn into_options(self, defaults: &Defaults) -> WorkloadOptions {
        let on = |flag: bool, default: Option<bool>| flag || default.unwrap_or(false);

        WorkloadOptions {
            image: self.image.or_else(|| defaults.image.clone()),
            command: self.pod_command.or_else(|| defaults.command.clone()),
            args: self.pod_args.or_else(|| defaults.args.clone()),
            run_as_user: self.user.or(defaults.user),
            run_as_group: self.group.or(defaults.group),
            privileged: on(self.privileged, defaults.privileged),
            allow_privilege_escalation: on(
                self.allow_privilege_escalation,
                defaults.allow_privilege_escalation,
            ),
            non_root: on(self.non_root, defaults.non_root),
            node_name: self.node_name.or_else(|| defaults.node_name.clone()),
            node_exec: on(self.node_exec, defaults.node_exec),
            network_policy: on(self.network_policy, defaults.network_policy),
            pod_security_policy: on(self.pod_security_policy, defaults.pod_security_policy),
            dry_run: self.dry_run,
        }
    }
}

/// Create the debugging workload and its supporting resources.
pub async fn cmd_create(global: &GlobalArgs, defaults: &Defaults, args: CreateArgs) {
    let (identity, loaded) = resolve_identity(global);
    let format = args.output;
    let spec = or_exit(WorkloadSpec::resolve(identity, args.into_options(defaults)));
    tracing::info!(image = %spec.image, "resolved workload");

    let mut out = io::stdout().lock();
    if spec.dry_run {
        sonarlib::create::print(&spec, format, &mut out);
    } else {
        let cluster = connect(global, loaded).await;
        sonarlib::create::run(&cluster, &spec, format, &mut out).await;
    }
}

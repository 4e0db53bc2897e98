pub mod create;
pub mod defaults;
pub mod delete;
pub mod util;

use std::path::PathBuf;

use sonarlib::kubeconfig;

use crate::defaults::Defaults;

/// Flags accepted by every subcommand.
#[derive(Clone, Debug, Default, clap::Args)]
#[group(skip)]
pub struct GlobalArgs {
    /// Name given to all the created resources, prefixed with `sonar-`.  At
    /// most 50 characters.  If not given, resources are named `sonar`.
    #[clap(short = 'N', long = "name", env = "SONAR_NAME", global = true)]
    pub name: Option<String>,

    /// Namespace to operate in.  Defaults to the namespace of the kubeconfig
    /// context.
    #[clap(short = 'n', long = "namespace", env = "SONAR_NAMESPACE", global = true)]
    pub namespace: Option<String>,

    #[command(flatten)]
    pub kube: kubeconfig::Config,

    /// YAML file of default flag values.  Defaults to
    /// `~/.config/sonar/defaults.yaml`, if it exists.
    #[clap(long = "defaults-file", value_parser, env = "SONAR_DEFAULTS", global = true)]
    pub defaults_file: Option<PathBuf>,

    /// Log as JSON rather than human-readable text.
    #[clap(long = "log-json", global = true)]
    pub log_json: bool,
}

impl GlobalArgs {
    /// Fill in anything not given on the command line from the defaults
    /// file.
    pub fn with_defaults(mut self, defaults: &Defaults) -> Self {
        self.name = self.name.or_else(|| defaults.name.clone());
        self.namespace = self.namespace.or_else(|| defaults.namespace.clone());
        self.kube.kubeconfig = self.kube.kubeconfig.or_else(|| defaults.kubeconfig.clone());
        self.kube.context = self.kube.context.or_else(|| defaults.context.clone());
        self
    }
}

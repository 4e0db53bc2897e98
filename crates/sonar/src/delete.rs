use sonarlib::prompt::Prompt;

use crate::defaults::Defaults;
use crate::util::*;
use crate::GlobalArgs;

#[derive(Clone, Debug, Default, clap::Args)]
pub struct DeleteArgs {
    /// Skip all confirmation prompts.
    #[arg(short = 'f', long = "force")]
    pub force: bool,
}

/// Delete every resource belonging to the debugging workload.
pub async fn cmd_delete(global: &GlobalArgs, defaults: &Defaults, args: DeleteArgs) {
    let (identity, loaded) = resolve_identity(global);
    let force = args.force || defaults.force.unwrap_or(false);

    let cluster = connect(global, loaded).await;
    sonarlib::delete::run(&cluster, &identity, force, &mut Prompt::stdio()).await;
}

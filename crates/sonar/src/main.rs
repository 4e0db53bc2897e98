use clap::{Parser, Subcommand};
use std::io;
use tracing_subscriber::EnvFilter;

use sonar::create;
use sonar::defaults;
use sonar::delete;
use sonar::util::or_exit;
use sonar::GlobalArgs;

/// Sonar deploys a debugging container to a Kubernetes cluster.
#[derive(Debug, Parser)]
#[command(name = "sonar", version)]
struct Args {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the debugging deployment and its supporting resources.
    /// Resources which already exist are left alone.
    Create(create::CreateArgs),
    /// Delete all the resources belonging to the debugging deployment,
    /// asking for confirmation before each one.
    #[command(alias = "destroy")]
    Delete(delete::DeleteArgs),
    /// Print the version.
    Version,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.global.log_json);

    let defaults = or_exit(defaults::load(args.global.defaults_file.as_deref()));
    let global = args.global.with_defaults(&defaults);

    match args.command {
        Command::Create(cmd_args) => create::cmd_create(&global, &defaults, cmd_args).await,
        Command::Delete(cmd_args) => delete::cmd_delete(&global, &defaults, cmd_args).await,
        Command::Version => tracing::info!("version: {}", sonarlib::VERSION),
    }
}

/// Log to stderr, so stdout only has dry-run output.  The level is taken from
/// `RUST_LOG`, defaulting to `info`.
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }
}

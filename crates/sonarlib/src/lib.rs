#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::wildcard_imports)]

pub mod cluster;
pub mod create;
pub mod delete;
pub mod error;
pub mod identity;
pub mod kubeconfig;
pub mod prompt;
pub mod resources;
pub mod workload;

/// Exit code in case the configuration is invalid or the cluster cannot be
/// reached.
pub static EXIT_CODE_INITIALISE_FAILED: i32 = 1;

/// Crate version, reported by `sonar version`.
pub static VERSION: &str = env!("CARGO_PKG_VERSION");

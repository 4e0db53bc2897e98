use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::PathBuf;

use crate::error::Error;

/// Namespace used when neither the flags nor the context give one.
pub static FALLBACK_NAMESPACE: &str = "default";

/// Options to locate the cluster.
#[derive(Clone, Debug, Default, clap::Args)]
#[group(skip)]
pub struct Config {
    /// Path to the kubeconfig file.  Defaults to the first entry of
    /// `KUBECONFIG`, then `~/.kube/config`.
    #[clap(long = "kubeconfig", value_parser, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Name of the kubeconfig context to use.  Defaults to the current
    /// context.
    #[clap(long = "context", env = "SONAR_CONTEXT", global = true)]
    pub context: Option<String>,
}

impl Config {
    /// Find the kubeconfig file: the explicit path, or the first path in
    /// `KUBECONFIG`, or `~/.kube/config`.
    pub fn path(&self) -> Result<PathBuf, Error> {
        let from_env = std::env::var_os("KUBECONFIG");
        resolve_path(self.kubeconfig.clone(), from_env.as_deref(), dirs::home_dir())
    }

    /// Read and parse the kubeconfig file.
    pub fn load(&self) -> Result<Loaded, Error> {
        let path = self.path()?;
        tracing::info!(path = %path.display(), "using kubeconfig");

        match Kubeconfig::read_from(&path) {
            Ok(kubeconfig) => Ok(Loaded {
                kubeconfig,
                context: self.context.clone(),
            }),
            Err(error) => Err(Error::Kubeconfig(path, error)),
        }
    }
}

/// A parsed kubeconfig, and the context to use from it.
#[derive(Clone, Debug)]
pub struct Loaded {
    pub kubeconfig: Kubeconfig,
    pub context: Option<String>,
}

impl Loaded {
    /// The context in use: the explicit one, or the file's current context.
    pub fn context_name(&self) -> Option<&str> {
        self.context
            .as_deref()
            .or(self.kubeconfig.current_context.as_deref())
    }

    /// The namespace configured on the context in use, falling back to
    /// `default` if the context doesn't set one.
    pub fn default_namespace(&self) -> String {
        let context_name = self.context_name();
        let namespace = self
            .kubeconfig
            .contexts
            .iter()
            .find(|named| Some(named.name.as_str()) == context_name)
            .and_then(|named| named.context.as_ref())
            .and_then(|context| context.namespace.clone())
            .filter(|ns| !ns.is_empty());

        match namespace {
            Some(ns) => ns,
            None => {
                tracing::info!(
                    context = context_name,
                    "no namespace set on context, using '{FALLBACK_NAMESPACE}'"
                );
                FALLBACK_NAMESPACE.to_string()
            }
        }
    }

    /// Build a client for the context in use.
    pub async fn client(self) -> Result<Client, Error> {
        let options = KubeConfigOptions {
            context: self.context,
            ..Default::default()
        };
        let config = kube::Config::from_custom_kubeconfig(self.kubeconfig, &options).await?;
        Ok(Client::try_from(config)?)
    }
}

fn resolve_path(
    explicit: Option<PathBuf>,
    from_env: Option<&std::ffi::OsStr>,
    home: Option<PathBuf>,
) -> Result<PathBuf, Error> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    if let Some(path) = from_env.and_then(|paths| std::env::split_paths(paths).next()) {
        if !path.as_os_str().is_empty() {
            return Ok(path);
        }
    }

    home.map(|home| home.join(".kube").join("config"))
        .ok_or(Error::NoKubeconfig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    static KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: dev
clusters:
- name: dev
  cluster:
    server: https://127.0.0.1:6443
users:
- name: dev
  user:
    token: abc
contexts:
- name: dev
  context:
    cluster: dev
    user: dev
    namespace: debugging
- name: bare
  context:
    cluster: dev
    user: dev
"#;

    fn loaded(context: Option<&str>) -> Loaded {
        Loaded {
            kubeconfig: Kubeconfig::from_yaml(KUBECONFIG).unwrap(),
            context: context.map(str::to_string),
        }
    }

    #[test]
    fn explicit_path_wins() {
        let path = resolve_path(
            Some(PathBuf::from("/explicit")),
            Some(OsStr::new("/from/env")),
            Some(PathBuf::from("/home/me")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/explicit"));
    }

    #[test]
    fn environment_before_home() {
        let path = resolve_path(
            None,
            Some(OsStr::new("/first:/second")),
            Some(PathBuf::from("/home/me")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/first"));
    }

    #[test]
    fn home_as_a_last_resort() {
        let path = resolve_path(None, Some(OsStr::new("")), Some(PathBuf::from("/home/me"))).unwrap();
        assert_eq!(path, PathBuf::from("/home/me/.kube/config"));

        assert!(matches!(resolve_path(None, None, None), Err(Error::NoKubeconfig)));
    }

    #[test]
    fn namespace_from_current_context() {
        assert_eq!(loaded(None).context_name(), Some("dev"));
        assert_eq!(loaded(None).default_namespace(), "debugging");
    }

    #[test]
    fn namespace_from_explicit_context() {
        assert_eq!(loaded(Some("bare")).context_name(), Some("bare"));
        assert_eq!(loaded(Some("bare")).default_namespace(), "default");
        assert_eq!(loaded(Some("missing")).default_namespace(), "default");
    }
}

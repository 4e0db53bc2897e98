use std::fmt;
use std::path::PathBuf;

/// Generic error type
#[derive(Debug)]
pub enum Error {
    ClientConfig(kube::config::KubeconfigError),
    Config(ConfigError),
    Kube(kube::Error),
    Kubeconfig(PathBuf, kube::config::KubeconfigError),
    NoKubeconfig,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientConfig(s) => write!(f, "client config: {s}"),
            Self::Config(s) => write!(f, "config: {s}"),
            Self::Kube(s) => write!(f, "kube: {s}"),
            Self::Kubeconfig(p, s) => write!(f, "kubeconfig '{p}': {s}", p = p.display()),
            Self::NoKubeconfig => write!(f, "kubeconfig: could not determine a location"),
        }
    }
}

impl std::error::Error for Error {}

impl From<kube::config::KubeconfigError> for Error {
    fn from(error: kube::config::KubeconfigError) -> Self {
        Self::ClientConfig(error)
    }
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl From<kube::Error> for Error {
    fn from(error: kube::Error) -> Self {
        Self::Kube(error)
    }
}

/// Errors in the user-supplied configuration.  All of these are fatal, and
/// are detected before any request is made to the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NameTooLong(usize),
    BadName(String),
    BadNamespace(String),
    MissingImage,
    MissingNodeName,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTooLong(max) => write!(f, "name must be {max} characters or less"),
            Self::BadName(s) => write!(
                f,
                "name '{s}' can only contain alphanumeric characters, hyphens and periods"
            ),
            Self::BadNamespace(s) => write!(
                f,
                "namespace '{s}' can only contain alphanumeric characters and hyphens"
            ),
            Self::MissingImage => write!(f, "image name for the debugging container must be provided"),
            Self::MissingNodeName => write!(f, "a node name must be provided when node-exec is set"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The outcome of a failed request to the cluster, reduced to the cases the
/// create and delete flows care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    AlreadyExists,
    NotFound,
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "already exists"),
            Self::NotFound => write!(f, "not found"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<kube::Error> for ApiError {
    fn from(error: kube::Error) -> Self {
        match error {
            kube::Error::Api(response) if response.reason == "AlreadyExists" => {
                Self::AlreadyExists
            }
            kube::Error::Api(response) if response.code == 404 => Self::NotFound,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Errors turning a manifest into text.
#[derive(Debug)]
pub enum RenderError {
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(s) => write!(f, "json: {s}"),
            Self::Yaml(s) => write!(f, "yaml: {s}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<serde_json::Error> for RenderError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<serde_yaml::Error> for RenderError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Yaml(error)
    }
}

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::resources::ResourceKind;

/// Every resource name starts with this, and it is also the `created-by` and
/// `owner` label value.
pub static NAME_STUB: &str = "sonar";

/// Maximum length of the user-supplied part of the name.
pub static NAME_MAX_LENGTH: usize = 50;

/// The name, namespace, and labels shared by every resource belonging to one
/// debugging workload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
}

impl Identity {
    /// Construct an identity from an already-validated full name.
    pub fn new(name: String, namespace: String) -> Self {
        let labels = BTreeMap::from([
            ("created-by".to_string(), NAME_STUB.to_string()),
            ("owner".to_string(), NAME_STUB.to_string()),
            ("name".to_string(), name.clone()),
        ]);

        Self {
            name,
            namespace,
            labels,
        }
    }

    /// Validate the user-supplied name and namespace and build the identity.
    ///
    /// `context_namespace` is only called if no namespace was given, and only
    /// after the name and namespace have passed validation.
    pub fn resolve<F>(
        name: Option<&str>,
        namespace: Option<&str>,
        context_namespace: F,
    ) -> Result<Self, crate::error::Error>
    where
        F: FnOnce() -> Result<String, crate::error::Error>,
    {
        let full_name = validate_name(name)?;

        let namespace = match namespace.filter(|ns| !ns.is_empty()) {
            Some(ns) => {
                validate_namespace(ns)?;
                ns.to_string()
            }
            None => context_namespace()?,
        };

        Ok(Self::new(full_name, namespace))
    }

    /// The name given to a resource of this kind.  Cluster-scoped resources
    /// are suffixed with the namespace, so workloads of the same name in
    /// different namespaces don't share them.  Namespaces can't contain a
    /// `.`, so the suffix is unambiguous.
    pub fn object_name(&self, kind: ResourceKind) -> String {
        if kind.is_namespaced() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.namespace)
        }
    }

    /// The labels rendered as a label selector, eg `a=b,c=d`.
    pub fn label_selector(&self) -> String {
        self.labels
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Check the user-supplied part of the name and prepend the stub to it.  An
/// absent or empty name gives just the stub.
pub fn validate_name(name: Option<&str>) -> Result<String, ConfigError> {
    match name {
        None | Some("") => Ok(NAME_STUB.to_string()),
        Some(token) => {
            if token.len() > NAME_MAX_LENGTH {
                return Err(ConfigError::NameTooLong(NAME_MAX_LENGTH));
            }

            let valid_character = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '.';
            if !token.chars().all(valid_character) {
                return Err(ConfigError::BadName(token.to_string()));
            }

            Ok(format!("{NAME_STUB}-{token}"))
        }
    }
}

/// Check that a namespace contains only ASCII letters, digits, and hyphens.
pub fn validate_namespace(namespace: &str) -> Result<(), ConfigError> {
    let valid_character = |c: char| c.is_ascii_alphanumeric() || c == '-';

    if namespace.chars().all(valid_character) {
        Ok(())
    } else {
        Err(ConfigError::BadNamespace(namespace.to_string()))
    }
}

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the defaults file, relative to the user's config directory.
pub static DEFAULTS_FILE: &str = "sonar/defaults.yaml";

/// Default flag values, read from a YAML file.  Every field is optional, and
/// flags given on the command line take precedence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Defaults {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub context: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub image: Option<String>,
    pub command: Option<String>,
    pub args: Option<String>,
    pub user: Option<i64>,
    pub group: Option<i64>,
    pub node_name: Option<String>,
    pub privileged: Option<bool>,
    pub allow_privilege_escalation: Option<bool>,
    pub non_root: Option<bool>,
    pub node_exec: Option<bool>,
    pub network_policy: Option<bool>,
    pub pod_security_policy: Option<bool>,
    pub force: Option<bool>,
}

/// Errors reading the defaults file.
#[derive(Debug)]
pub enum Error {
    Read(PathBuf, std::io::Error),
    Parse(PathBuf, serde_yaml::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(p, s) => write!(f, "could not read '{p}': {s}", p = p.display()),
            Self::Parse(p, s) => write!(f, "could not parse '{p}': {s}", p = p.display()),
        }
    }
}

impl std::error::Error for Error {}

/// Load the defaults.  An explicitly-given file must exist; the file in the
/// config directory is optional.
pub fn load(explicit: Option<&Path>) -> Result<Defaults, Error> {
    match explicit {
        Some(path) => read(path),
        None => match dirs::config_dir().map(|dir| dir.join(DEFAULTS_FILE)) {
            Some(path) if path.is_file() => read(&path),
            _ => Ok(Defaults::default()),
        },
    }
}

fn read(path: &Path) -> Result<Defaults, Error> {
    let text = fs::read_to_string(path).map_err(|error| Error::Read(path.to_owned(), error))?;
    let defaults = parse(&text).map_err(|error| Error::Parse(path.to_owned(), error))?;
    tracing::debug!(path = %path.display(), "loaded defaults");

    Ok(defaults)
}

fn parse(text: &str) -> Result<Defaults, serde_yaml::Error> {
    // an empty file is null, not an empty mapping
    if text.trim().is_empty() {
        Ok(Defaults::default())
    } else {
        serde_yaml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_kebab_case_keys() {
        let defaults = parse(
            "image: glitchcrab/ubuntu-debug:v1.0\n\
             namespace: debugging\n\
             user: 2000\n\
             pod-security-policy: true\n\
             node-name: worker-1\n",
        )
        .unwrap();

        assert_eq!(
            defaults,
            Defaults {
                image: Some("glitchcrab/ubuntu-debug:v1.0".to_string()),
                namespace: Some("debugging".to_string()),
                user: Some(2000),
                pod_security_policy: Some(true),
                node_name: Some("worker-1".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn empty_file_is_no_defaults() {
        assert_eq!(parse("").unwrap(), Defaults::default());
        assert_eq!(parse("\n  \n").unwrap(), Defaults::default());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(parse("imgae: busybox\n").is_err());
    }

    #[test]
    fn loads_an_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: test").unwrap();
        writeln!(file, "force: true").unwrap();

        let defaults = load(Some(file.path())).unwrap();
        assert_eq!(defaults.name.as_deref(), Some("test"));
        assert_eq!(defaults.force, Some(true));
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");

        assert!(matches!(load(Some(&missing)), Err(Error::Read(p, _)) if p == missing));
    }

    #[test]
    fn reports_the_file_on_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user: not-a-number").unwrap();

        let error = load(Some(file.path())).unwrap_err();
        assert!(error.to_string().contains(&file.path().display().to_string()));
    }
}

use crate::domain::ProjectLocation;
use crate::error::{Result, SemanticReleaseError};
use crate::files::VariableFile;
use crate::git::Credentials;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the configuration file looked up in the working directory and the
/// user config directory.
pub const CONFIG_FILE_NAME: &str = "semantic-release.toml";

/// Placeholder standing for a line break in a flattened SSH key.
pub const KEY_LINE_BREAKER: &str = "#";

/// Represents the complete configuration for semantic-release.
///
/// Every section is optional; missing values fall back to the defaults below
/// and can be overridden from the command line.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_username() -> String {
    "git".to_string()
}

fn default_changelog_path() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_true() -> bool {
    true
}

/// Which repository to release and where to clone it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    /// Hosting service, e.g. `gitlab.com`
    pub host: Option<String>,
    pub group: Option<String>,
    pub project: Option<String>,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Clone URL; derived from host, group and project when absent
    pub url: Option<String>,

    /// Clone destination; `<home>/<project>` when absent
    pub destination: Option<PathBuf>,

    /// Delete an existing clone and clone again
    #[serde(default = "default_true")]
    pub fresh_clone: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            host: None,
            group: None,
            project: None,
            remote: default_remote(),
            url: None,
            destination: None,
            fresh_clone: true,
        }
    }
}

fn required<'a>(value: &'a Option<String>, what: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SemanticReleaseError::config(format!("{} must be specified", what)))
}

impl RepositoryConfig {
    /// Host, group and project, all required.
    pub fn location(&self) -> Result<ProjectLocation> {
        Ok(ProjectLocation {
            host: required(&self.host, "git host name")?.to_string(),
            group: required(&self.group, "git group name")?.to_string(),
            project: required(&self.project, "git project name")?.to_string(),
        })
    }

    /// SSH clone URL: `git@<host>:<group>/<project>.git` unless `url` is set.
    pub fn clone_url(&self) -> Result<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.to_string());
        }
        let location = self.location()?;
        Ok(format!(
            "git@{}:{}/{}.git",
            location.host, location.group, location.project
        ))
    }

    pub fn destination(&self) -> Result<PathBuf> {
        if let Some(destination) = &self.destination {
            return Ok(destination.clone());
        }
        let project = required(&self.project, "git project name")?;
        let home = dirs::home_dir()
            .ok_or_else(|| SemanticReleaseError::config("cannot determine home directory"))?;
        Ok(home.join(project))
    }
}

/// SSH authentication for clone and push.
///
/// An inline key wins over a key path; with neither the SSH agent is used.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AuthConfig {
    #[serde(default = "default_username")]
    pub username: String,

    /// Private key on one line, with line breaks written as `#`
    pub ssh_key: Option<String>,

    pub ssh_key_path: Option<PathBuf>,

    pub passphrase: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            username: default_username(),
            ssh_key: None,
            ssh_key_path: None,
            passphrase: None,
        }
    }
}

impl AuthConfig {
    pub fn credentials(&self) -> Credentials {
        if let Some(key) = self.ssh_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Credentials::from_flattened_key(
                self.username.clone(),
                key,
                KEY_LINE_BREAKER,
                self.passphrase.clone(),
            );
        }
        if let Some(path) = &self.ssh_key_path {
            return Credentials::SshKeyFile {
                username: self.username.clone(),
                path: path.clone(),
                passphrase: self.passphrase.clone(),
            };
        }
        Credentials::SshAgent {
            username: self.username.clone(),
        }
    }
}

/// Which release steps run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_true")]
    pub changelog: bool,

    #[serde(default = "default_changelog_path")]
    pub changelog_path: PathBuf,

    #[serde(default = "default_true")]
    pub create_tag: bool,

    #[serde(default = "default_true")]
    pub push: bool,

    #[serde(default)]
    pub variable_files: Vec<VariableFile>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            changelog: true,
            changelog_path: default_changelog_path(),
            create_tag: true,
            push: true,
            variable_files: Vec::new(),
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "loading configuration");
    let content = fs::read_to_string(path).map_err(|e| {
        SemanticReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content).map_err(|e| {
        SemanticReleaseError::config(format!("invalid {}: {}", path.display(), e))
    })
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `semantic-release.toml` in current directory
/// 3. `semantic-release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or the custom
///   path does not exist
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return read_config(&local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join(CONFIG_FILE_NAME);
        if global.exists() {
            return read_config(&global);
        }
    }

    debug!("no configuration file found, using defaults");
    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_location() -> RepositoryConfig {
        RepositoryConfig {
            host: Some("gitlab.com".to_string()),
            group: Some("platform".to_string()),
            project: Some("billing".to_string()),
            ..RepositoryConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.repository.remote, "origin");
        assert!(config.repository.fresh_clone);
        assert_eq!(config.auth.username, "git");
        assert!(config.release.changelog);
        assert!(config.release.create_tag);
        assert!(config.release.push);
        assert_eq!(config.release.changelog_path, PathBuf::from("CHANGELOG.md"));
    }

    #[test]
    fn test_empty_toml_matches_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_clone_url_from_location() {
        assert_eq!(
            with_location().clone_url().unwrap(),
            "git@gitlab.com:platform/billing.git"
        );

        let explicit = RepositoryConfig {
            url: Some("/srv/git/billing.git".to_string()),
            ..RepositoryConfig::default()
        };
        assert_eq!(explicit.clone_url().unwrap(), "/srv/git/billing.git");
    }

    #[test]
    fn test_location_requires_every_part() {
        let mut repository = with_location();
        repository.group = Some("  ".to_string());
        let err = repository.location().unwrap_err();
        assert!(err.to_string().contains("git group name must be specified"));
    }

    #[test]
    fn test_destination() {
        let repository = RepositoryConfig {
            destination: Some(PathBuf::from("/tmp/work")),
            ..with_location()
        };
        assert_eq!(repository.destination().unwrap(), PathBuf::from("/tmp/work"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(with_location().destination().unwrap(), home.join("billing"));
        }
    }

    #[test]
    fn test_credentials_selection() {
        let mut auth = AuthConfig::default();
        assert!(matches!(auth.credentials(), Credentials::SshAgent { .. }));

        auth.ssh_key_path = Some(PathBuf::from("/home/ci/.ssh/id_ed25519"));
        assert!(matches!(auth.credentials(), Credentials::SshKeyFile { .. }));

        auth.ssh_key = Some("-----BEGIN-----#body#-----END-----".to_string());
        match auth.credentials() {
            Credentials::SshKey { private_key, .. } => {
                assert_eq!(private_key, "-----BEGIN-----\nbody\n-----END-----")
            }
            other => panic!("unexpected credentials {:?}", other),
        }
    }

    #[test]
    fn test_missing_custom_path_is_error() {
        let err = load_config(Some("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, SemanticReleaseError::Config(_)));
    }
}

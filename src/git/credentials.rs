use git2::{Cred, CredentialType, RemoteCallbacks};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Upper bound on credential callback invocations for one network operation.
///
/// libgit2 keeps asking while authentication fails; without a bound a
/// rejected key loops forever.
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Authentication material handed to the repository client.
///
/// It is passed through opaquely to libgit2 and never logged.
#[derive(Clone)]
pub enum Credentials {
    /// Private key held in memory
    SshKey {
        username: String,
        private_key: String,
        passphrase: Option<String>,
    },
    /// Private key read from disk by libgit2
    SshKeyFile {
        username: String,
        path: PathBuf,
        passphrase: Option<String>,
    },
    /// Keys offered by a running ssh-agent
    SshAgent { username: String },
}

impl Credentials {
    /// Build in-memory key credentials from a key whose line breaks were
    /// replaced by `line_breaker` (single-line environment variables and
    /// build args cannot carry newlines).
    pub fn from_flattened_key(
        username: impl Into<String>,
        flattened_key: &str,
        line_breaker: &str,
        passphrase: Option<String>,
    ) -> Self {
        Credentials::SshKey {
            username: username.into(),
            private_key: flattened_key.replace(line_breaker, "\n"),
            passphrase,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Credentials::SshKey { username, .. }
            | Credentials::SshKeyFile { username, .. }
            | Credentials::SshAgent { username } => username,
        }
    }

    fn to_cred(&self, username_from_url: Option<&str>) -> Result<Cred, git2::Error> {
        let username = username_from_url.unwrap_or(self.username());
        match self {
            Credentials::SshKey {
                private_key,
                passphrase,
                ..
            } => Cred::ssh_key_from_memory(username, None, private_key, passphrase.as_deref()),
            Credentials::SshKeyFile {
                path, passphrase, ..
            } => Cred::ssh_key(username, None, path, passphrase.as_deref()),
            Credentials::SshAgent { .. } => Cred::ssh_key_from_agent(username),
        }
    }

    /// Remote callbacks answering credential requests with this material.
    pub fn remote_callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();
        let mut attempts = 0;

        callbacks.credentials(move |url, username_from_url, allowed_types| {
            attempts += 1;
            if attempts > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str(&format!(
                    "authentication failed for {} after {} attempts",
                    url, MAX_CREDENTIAL_ATTEMPTS
                )));
            }
            debug!(%url, attempt = attempts, "answering credential request");

            if allowed_types.contains(CredentialType::USERNAME) {
                return Cred::username(self.username());
            }
            if allowed_types.contains(CredentialType::SSH_KEY) {
                return self.to_cred(username_from_url);
            }
            Cred::default()
        });

        callbacks
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials::SshAgent {
            username: "git".to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::SshKey { username, .. } => f
                .debug_struct("SshKey")
                .field("username", username)
                .field("private_key", &"<redacted>")
                .finish(),
            Credentials::SshKeyFile { username, path, .. } => f
                .debug_struct("SshKeyFile")
                .field("username", username)
                .field("path", path)
                .finish(),
            Credentials::SshAgent { username } => {
                f.debug_struct("SshAgent").field("username", username).finish()
            }
        }
    }
}

//! Universal-auth credentials and where they come from
//!
//! Credentials are read from the process environment after loading any
//! `.env` files, so a file written by `browse init` and variables exported
//! in the shell both work. Variables already set in the environment win.

use crate::error::ClientError;
use browser_core::format;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const CLIENT_ID_VAR: &str = "INFISICAL_UNIVERSAL_AUTH_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "INFISICAL_UNIVERSAL_AUTH_CLIENT_SECRET";
pub const PROJECT_ID_VAR: &str = "INFISICAL_PROJECT_ID";
pub const ENV_SLUG_VAR: &str = "INFISICAL_ENV_SLUG";

/// The four strings needed before a client can be initialized
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub project_id: String,
    pub environment: String,
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).unwrap_or_default();
        Self {
            client_id: read(CLIENT_ID_VAR),
            client_secret: read(CLIENT_SECRET_VAR),
            project_id: read(PROJECT_ID_VAR),
            environment: read(ENV_SLUG_VAR),
        }
    }

    /// Load `.env` files into the process environment without overriding
    /// anything already set. Returns the files that were read.
    pub fn load_env_files(candidates: &[PathBuf]) -> Vec<PathBuf> {
        let mut loaded = Vec::new();
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match dotenvy::from_path(path) {
                Ok(()) => loaded.push(path.clone()),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable .env file"),
            }
        }
        loaded
    }

    /// Replace project and environment when given on the command line
    pub fn with_overrides(mut self, project: Option<String>, environment: Option<String>) -> Self {
        if let Some(project) = project {
            self.project_id = project;
        }
        if let Some(environment) = environment {
            self.environment = environment;
        }
        self
    }

    /// All four values must be non-empty
    pub fn validate(&self) -> Result<(), ClientError> {
        for (name, value) in self.fields() {
            if value.trim().is_empty() {
                return Err(ClientError::MissingCredential(name));
            }
        }
        Ok(())
    }

    /// Variable name and ✓/✗ for each credential, safe to print
    pub fn presence(&self) -> Vec<(&'static str, &'static str)> {
        self.fields()
            .into_iter()
            .map(|(name, value)| (name, format::presence(value)))
            .collect()
    }

    /// Write the credentials as a `.env` file readable only by the owner
    pub fn write_env_file(&self, path: &Path) -> io::Result<()> {
        let mut content = String::new();
        for (name, value) in self.fields() {
            if value.contains('\'') || value.contains('\n') {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} contains a quote or newline", name),
                ));
            }
            // Single quotes keep dotenv from expanding `$` inside secrets
            content.push_str(&format!("{}='{}'\n", name, value));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    fn fields(&self) -> [(&'static str, &str); 4] {
        [
            (CLIENT_ID_VAR, self.client_id.as_str()),
            (CLIENT_SECRET_VAR, self.client_secret.as_str()),
            (PROJECT_ID_VAR, self.project_id.as_str()),
            (ENV_SLUG_VAR, self.environment.as_str()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &format::presence(&self.client_id))
            .field("client_secret", &format::presence(&self.client_secret))
            .field("project_id", &format::presence(&self.project_id))
            .field("environment", &format::presence(&self.environment))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn full() -> Credentials {
        Credentials {
            client_id: "id-123".to_string(),
            client_secret: "s3cr3t$HOME".to_string(),
            project_id: "proj".to_string(),
            environment: "dev".to_string(),
        }
    }

    #[test]
    fn test_from_lookup_trims_and_defaults() {
        let vars: HashMap<&str, &str> = [(CLIENT_ID_VAR, " id "), (ENV_SLUG_VAR, "prod")].into();
        let creds = Credentials::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.environment, "prod");
        assert!(creds.client_secret.is_empty());
    }

    #[test]
    fn test_validate_names_first_missing_variable() {
        assert!(full().validate().is_ok());

        let creds = Credentials {
            client_secret: String::new(),
            ..full()
        };
        match creds.validate() {
            Err(ClientError::MissingCredential(name)) => assert_eq!(name, CLIENT_SECRET_VAR),
            other => panic!("Expected MissingCredential, got {:?}", other),
        }
    }

    #[test]
    fn test_overrides() {
        let creds = full().with_overrides(Some("other".to_string()), None);
        assert_eq!(creds.project_id, "other");
        assert_eq!(creds.environment, "dev");
    }

    #[test]
    fn test_presence_and_debug_never_show_secrets() {
        let creds = Credentials {
            project_id: String::new(),
            ..full()
        };
        let presence = creds.presence();
        assert_eq!(presence[0], (CLIENT_ID_VAR, "✓"));
        assert_eq!(presence[2], (PROJECT_ID_VAR, "✗"));

        let debug = format!("{:?}", creds);
        assert!(!debug.contains("s3cr3t"));
        assert!(!debug.contains("id-123"));
    }

    #[test]
    fn test_debug_hides_project_and_environment() {
        let creds = Credentials {
            project_id: "proj-SECRET-ID".to_string(),
            environment: "prod-slug".to_string(),
            ..full()
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("proj-SECRET-ID"));
        assert!(!debug.contains("prod-slug"));
        assert_eq!(
            debug,
            r#"Credentials { client_id: "✓", client_secret: "✓", project_id: "✓", environment: "✓" }"#
        );
    }

    #[test]
    fn test_env_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config").join(".env");
        full().write_env_file(&path).unwrap();

        let vars: HashMap<String, String> = dotenvy::from_path_iter(&path)
            .unwrap()
            .map(|item| item.unwrap())
            .collect();
        let creds = Credentials::from_lookup(|name| vars.get(name).cloned());
        assert_eq!(creds, full());
    }

    #[test]
    fn test_env_file_rejects_quotes() {
        let dir = TempDir::new().unwrap();
        let creds = Credentials {
            client_secret: "it's".to_string(),
            ..full()
        };
        let err = creds.write_env_file(&dir.path().join(".env")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}

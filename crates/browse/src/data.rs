//! Loading credentials, config and secrets

use anyhow::{Context, Result};
use browser_core::{Config, Paths};
use chrono::{DateTime, Local};
use infisical::{ClientError, Credentials, InfisicalClient};
use secret_tree::{build_tree, TreeNode};
use std::path::PathBuf;

/// One fetch worth of secrets, already arranged as a tree
pub struct Snapshot {
    pub tree: TreeNode,
    pub secret_count: usize,
    /// Region that served the token and the secrets
    pub region: String,
    pub fetched_at: DateTime<Local>,
}

pub fn load_config(paths: &Paths) -> Result<Config> {
    let file = paths.config_file();
    Config::load(&file).with_context(|| format!("Failed to load config from {}", file.display()))
}

/// Credentials from the environment, after reading `./.env` and the `.env`
/// written by `browse init`
pub fn load_credentials(paths: &Paths, project: Option<String>, environment: Option<String>) -> Credentials {
    let loaded = Credentials::load_env_files(&[PathBuf::from(".env"), paths.env_file()]);
    for path in &loaded {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
    Credentials::from_env().with_overrides(project, environment)
}

/// Authenticate (with regional fallback) and fetch the whole environment
pub async fn fetch(credentials: &Credentials, config: &Config) -> Result<Snapshot, ClientError> {
    let client = InfisicalClient::connect(credentials, &config.regions).await?;
    let secrets = client.list_all_secrets().await?;
    let tree = build_tree(&secrets);

    Ok(Snapshot {
        secret_count: tree.secret_count(),
        tree,
        region: client.region().name.clone(),
        fetched_at: Local::now(),
    })
}

/// Link to a folder in the Infisical web app
pub fn web_url(config: &Config, credentials: &Credentials, folder_path: &str) -> String {
    format!(
        "{}/projects/secret-management/{}/secrets/{}?secretPath={}",
        config.app_url.trim_end_matches('/'),
        credentials.project_id,
        credentials.environment,
        urlencoding::encode(folder_path)
    )
}

/// Folder containing a node: folders are their own, secrets use their parent
pub fn folder_of(node: &TreeNode) -> String {
    if node.is_folder() {
        return node.path().to_string();
    }
    let parent = node
        .path()
        .strip_suffix(node.name())
        .map(|p| p.trim_end_matches('/'))
        .unwrap_or_default();
    if parent.is_empty() {
        "/".to_string()
    } else {
        parent.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use browser_core::Secret;

    fn credentials() -> Credentials {
        Credentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            project_id: "proj-1".to_string(),
            environment: "prod".to_string(),
        }
    }

    #[test]
    fn test_web_url_encodes_path() {
        let config = Config {
            app_url: "https://app.infisical.com/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            web_url(&config, &credentials(), "/prod/db"),
            "https://app.infisical.com/projects/secret-management/proj-1/secrets/prod?secretPath=%2Fprod%2Fdb"
        );
    }

    #[test]
    fn test_folder_of() {
        let tree = build_tree(&[
            Secret::new("DB_HOST", "db.local", "/prod/db"),
            Secret::new("ROOT", "r", "/"),
            Secret::new("BARE", "b", ""),
        ]);
        let prod = tree.find_folder("/prod").unwrap();
        assert_eq!(folder_of(prod), "/prod");

        let db = tree.find_folder("/prod/db").unwrap();
        assert_eq!(folder_of(&db.children()[0]), "/prod/db");

        for secret in tree.children().iter().filter(|c| !c.is_folder()) {
            assert_eq!(folder_of(secret), "/");
        }
    }
}

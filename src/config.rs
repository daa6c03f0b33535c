use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_PLACEHOLDER_LABEL: &str = "Dummy-Ticket";

const CONFIG_DIR_NAME: &str = "redmine-migrate";
const CONFIG_FILE_NAME: &str = "config.toml";
const TOKEN_ENV: &str = "GITHUB_TOKEN";
const USERNAME_ENV: &str = "GITHUB_USERNAME";

/// Validated settings for one invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tracker: TrackerConfig,
    pub import: ImportConfig,
}

/// Where the GitHub repository lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Redmine status ids whose issues end up closed on GitHub.
    pub closed_status_ids: BTreeSet<u64>,
    /// Redmine user id to GitHub login.
    pub users: HashMap<u64, String>,
    pub placeholder_label: String,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let stored = match path {
            Some(path) => StoredConfig::load_from(path)?,
            None => StoredConfig::load()?,
        };
        Self::resolve(stored)
    }

    /// Applies environment overrides to the stored values and checks required keys.
    pub fn resolve(stored: StoredConfig) -> AppResult<Self> {
        let github = stored.github;
        let token = env_value(TOKEN_ENV).or(github.token);
        let username = env_value(USERNAME_ENV).or(github.username);

        let tracker = TrackerConfig {
            api_url: non_empty(github.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            owner: require(github.owner, "github.owner")?,
            repo: require(github.repo, "github.repo")?,
            username: require(username, "github.username (or GITHUB_USERNAME)")?,
            token: require(token, "github.token (or GITHUB_TOKEN)")?,
        };

        let mut users = HashMap::with_capacity(stored.import.users.len());
        for (redmine_id, login) in stored.import.users {
            let id = redmine_id.trim().parse::<u64>().map_err(|_| {
                AppError::Configuration(format!(
                    "import.users key '{redmine_id}' is not a Redmine user id"
                ))
            })?;
            users.insert(id, login);
        }

        let import = ImportConfig {
            closed_status_ids: stored.import.closed_status_ids.into_iter().collect(),
            users,
            placeholder_label: non_empty(stored.import.placeholder_label)
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_LABEL.to_string()),
        };

        Ok(Self { tracker, import })
    }
}

/// The on-disk TOML layout. Every field is optional so partial files load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default)]
    pub github: StoredGithub,
    #[serde(default)]
    pub import: StoredImport,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredGithub {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredImport {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub closed_status_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub users: BTreeMap<String, String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    /// Reads a config file; a missing file yields an empty config.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = toml::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("could not determine the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

fn env_value(key: &str) -> Option<String> {
    non_empty(env::var(key).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(value: Option<String>, key: &str) -> AppResult<String> {
    non_empty(value).ok_or_else(|| AppError::Configuration(format!("{key} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[github]
owner = "acme"
repo = "tracker"
username = "octo"
token = "file-token"

[import]
closed_status_ids = [3, 5, 6]

[import.users]
1 = "octo"
2 = "hubot"
"#;

    fn without_env<F: FnOnce() -> R, R>(f: F) -> R {
        temp_env::with_vars([(TOKEN_ENV, None::<&str>), (USERNAME_ENV, None)], f)
    }

    #[test]
    fn resolves_sample_file() {
        let stored: StoredConfig = toml::from_str(SAMPLE).unwrap();
        let config = without_env(|| AppConfig::resolve(stored)).unwrap();

        assert_eq!(config.tracker.api_url, DEFAULT_API_URL);
        assert_eq!(config.tracker.owner, "acme");
        assert_eq!(config.tracker.token, "file-token");
        assert_eq!(
            config.import.closed_status_ids,
            BTreeSet::from([3, 5, 6])
        );
        assert_eq!(config.import.users.get(&2).map(String::as_str), Some("hubot"));
        assert_eq!(config.import.placeholder_label, DEFAULT_PLACEHOLDER_LABEL);
    }

    #[test]
    fn environment_overrides_token() {
        let stored: StoredConfig = toml::from_str(SAMPLE).unwrap();
        let config = temp_env::with_vars(
            [(TOKEN_ENV, Some("env-token")), (USERNAME_ENV, None)],
            || AppConfig::resolve(stored),
        )
        .unwrap();
        assert_eq!(config.tracker.token, "env-token");
        assert_eq!(config.tracker.username, "octo");
    }

    #[test]
    fn rejects_missing_token() {
        let mut stored: StoredConfig = toml::from_str(SAMPLE).unwrap();
        stored.github.token = Some("   ".to_string());
        let err = without_env(|| AppConfig::resolve(stored)).unwrap_err();
        assert!(matches!(err, AppError::Configuration(msg) if msg.contains("github.token")));
    }

    #[test]
    fn rejects_non_numeric_user_key() {
        let mut stored: StoredConfig = toml::from_str(SAMPLE).unwrap();
        stored
            .import
            .users
            .insert("admin".to_string(), "octo".to_string());
        let err = without_env(|| AppConfig::resolve(stored)).unwrap_err();
        assert!(matches!(err, AppError::Configuration(msg) if msg.contains("'admin'")));
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let stored = StoredConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(stored.github.owner.is_none());
        assert!(stored.import.users.is_empty());
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut stored: StoredConfig = toml::from_str(SAMPLE).unwrap();
        stored.import.placeholder_label = Some("Skipped".to_string());

        stored.save_to(&path).unwrap();
        let loaded = StoredConfig::load_from(&path).unwrap();

        assert_eq!(loaded.github.repo.as_deref(), Some("tracker"));
        assert_eq!(loaded.import.closed_status_ids, vec![3, 5, 6]);
        assert_eq!(loaded.import.placeholder_label.as_deref(), Some("Skipped"));
        assert_eq!(loaded.import.users.len(), 2);
    }
}

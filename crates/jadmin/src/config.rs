use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for one Jenkins instance
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Base URL, e.g. https://ci.example.com
    pub url: Option<String>,
    pub username: Option<String>,
    /// Password or API token
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load defaults, config files, then `JENKINS_*` environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let explicit_path = config_path.as_deref();
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(explicit_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("JENKINS_").only(&[
            "url",
            "username",
            "password",
            "timeout_secs",
        ]));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(
        &mut self,
        cli_url: Option<String>,
        cli_username: Option<String>,
        cli_password: Option<String>,
    ) {
        if let Some(url) = cli_url {
            self.url = Some(url);
        }
        if let Some(username) = cli_username {
            self.username = Some(username);
        }
        if let Some(password) = cli_password {
            self.password = Some(password);
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.url.as_deref() {
            None | Some("") => {
                return Err(anyhow!(
                    "Jenkins URL not configured. Set via --url, JENKINS_URL env var, or config file"
                ));
            }
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                return Err(anyhow!("Jenkins URL must start with http:// or https://: {}", url));
            }
            Some(_) => {}
        }

        match (&self.username, &self.password) {
            (Some(_), None) => Err(anyhow!(
                "Jenkins password not configured. Set via --password, JENKINS_PASSWORD env var, or config file"
            )),
            (None, Some(_)) => Err(anyhow!(
                "Jenkins username not configured. Set via --username, JENKINS_USERNAME env var, or config file"
            )),
            _ => Ok(()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Copy safe to print: the password is replaced by asterisks
    pub fn masked(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

/// Config files in the order they are merged; later files win
pub fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "jadmin").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("jadmin").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("jadmin")
            .join("config.toml")
    })
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("jadmin.toml"))
}

use crate::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_CSV_FILE, DEFAULT_KUMA_URL, DEFAULT_LOG_DIR,
    DEFAULT_TIMEOUT_SECONDS, PASSWORD_ENV, USERNAME_ENV,
};
use crate::error::{ImportError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub kuma: KumaConfig,
    pub import: ImportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KumaConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for KumaConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_KUMA_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub csv_file: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { csv_file: PathBuf::from(DEFAULT_CSV_FILE) }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from(DEFAULT_LOG_DIR) }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub url: Option<String>,
    pub csv_file: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
}

impl Config {
    /// Load configuration from `path`, or from the default file if present.
    ///
    /// An explicitly requested file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ImportError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.url {
            self.kuma.url = url;
        }
        if let Some(csv_file) = overrides.csv_file {
            self.import.csv_file = csv_file;
        }
        if let Some(timeout) = overrides.timeout_seconds {
            self.kuma.timeout_seconds = timeout;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.kuma.url).map_err(|e| {
            ImportError::Config(format!("Invalid server URL '{}': {}", self.kuma.url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ImportError::Config(format!(
                "Server URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.kuma.timeout_seconds == 0 {
            return Err(ImportError::Config("timeout_seconds must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Login credentials for the monitoring server
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Read credentials from `KUMA_USERNAME` / `KUMA_PASSWORD`.
    /// Call `dotenv::dotenv()` beforehand to pick up a local `.env` file.
    pub fn from_env() -> Result<Self> {
        let username = required_env(USERNAME_ENV)?;
        let password = required_env(PASSWORD_ENV)?;
        Ok(Self { username, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn required_env(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ImportError::Config(format!("{key} must be set (environment or .env file)"))),
    }
}

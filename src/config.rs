use crate::error::{ConfigError, Result, SavingsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = ".defender-savings.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

/// Inventory API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub query_endpoint: String,
    /// Items requested per page
    pub page_size: u32,
    /// Attempts per page request, including the first
    pub max_attempts: u32,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.orcasecurity.io".to_string(),
            query_endpoint: "/api/serving-layer/query".to_string(),
            page_size: 100,
            max_attempts: 3,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn query_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.query_endpoint
        )
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try the local file first, then ~/.config/defender-savings/config.toml
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("defender-savings").join("config.toml"))
                    .unwrap_or(local)
            }
        };

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("{}: {}", config_path.display(), e))
            })?;
            info!("Loaded config from {}", config_path.display());
            config
        } else {
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'defender-savings init' to create a config file.");
            }
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.page_size".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        if self.api.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.max_attempts".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("api.base_url".to_string()).into());
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}

/// Resolve the API token
///
/// An explicit token (flag or `TOKEN` env, via clap) wins, then a non-empty
/// `TOKEN` in the environment. Otherwise `TOKEN` is read from the `.env`
/// file in `dir`, even when the environment holds an empty value.
pub fn resolve_token(explicit: Option<String>, dir: &Path) -> Result<String> {
    token_from_sources(explicit, std::env::var("TOKEN").ok(), dir)
}

fn token_from_sources(
    explicit: Option<String>,
    from_env: Option<String>,
    dir: &Path,
) -> Result<String> {
    if let Some(token) = explicit
        .into_iter()
        .chain(from_env)
        .find(|t| !t.trim().is_empty())
    {
        return Ok(token);
    }

    let env_path = dir.join(".env");
    if env_path.exists() {
        info!("Loading token from .env");
        let parse_error =
            |e: dotenvy::Error| ConfigError::ParseError(format!("{}: {}", env_path.display(), e));
        // Read the file directly; loading into the process env would not
        // replace a TOKEN that is set but empty
        for item in dotenvy::from_path_iter(&env_path).map_err(parse_error)? {
            let (key, value) = item.map_err(parse_error)?;
            if key == "TOKEN" && !value.trim().is_empty() {
                return Ok(value);
            }
        }
    }

    Err(SavingsError::Config(ConfigError::MissingToken))
}

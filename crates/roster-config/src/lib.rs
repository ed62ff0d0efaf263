use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "roster";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_BIND: &str = "127.0.0.1:5001";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub allowed_origins: Vec<String>,
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: DEFAULT_BIND.parse().expect("default bind address"),
                allowed_origins: DEFAULT_ALLOWED_ORIGINS
                    .iter()
                    .map(|origin| origin.to_string())
                    .collect(),
                db_path: None,
            },
            client: ClientConfig {
                api_url: Url::parse(DEFAULT_API_URL).expect("default api url"),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid server.bind value: {0}")]
    InvalidBind(String),
    #[error("invalid server.allowed_origins entry: {0}")]
    InvalidOrigin(String),
    #[error("server.allowed_origins must list at least one origin")]
    EmptyOrigins,
    #[error("invalid server.db_path value")]
    InvalidDbPath,
    #[error("invalid client.api_url value: {0}")]
    InvalidApiUrl(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server: Option<ServerFile>,
    client: Option<ClientFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
    allowed_origins: Option<Vec<String>>,
    db_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClientFile {
    api_url: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

pub fn parse_bind(raw: &str) -> Result<SocketAddr> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBind(raw.to_string()))
}

/// Base URL of the HTTP API. Only http and https are accepted.
pub fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidApiUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidApiUrl(raw.to_string()));
    }
    Ok(url)
}

fn parse_origin(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidOrigin(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidOrigin(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(server) = parsed.server {
        if let Some(bind) = server.bind {
            config.server.bind = parse_bind(&bind)?;
        }
        if let Some(origins) = server.allowed_origins {
            if origins.is_empty() {
                return Err(ConfigError::EmptyOrigins);
            }
            config.server.allowed_origins = origins
                .iter()
                .map(|origin| parse_origin(origin))
                .collect::<Result<Vec<_>>>()?;
        }
        if let Some(path) = server.db_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidDbPath);
            }
            config.server.db_path = Some(path);
        }
    }

    if let Some(client) = parsed.client {
        if let Some(api_url) = client.api_url {
            config.client.api_url = parse_api_url(&api_url)?;
        }
    }

    Ok(config)
}

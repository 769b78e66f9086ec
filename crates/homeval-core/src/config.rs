// Configuration loading and parsing (config/homeval.toml + environment).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Environment variable that overrides `service.base_url`.
pub const API_URL_ENV: &str = "HOMEVAL_API_URL";

const CONFIG_FILE: &str = "homeval.toml";
const DEFAULT_LOG_FILTER: &str = "homeval=info,warn";
const DEFAULT_LOG_DIRECTORY: &str = "logs";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
}

/// Where the Prediction Service lives.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Origin (and optional path prefix) of the service, without a trailing
    /// `/`. Guaranteed non-empty and absolute http(s) after loading.
    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Directory for `homeval.log`, relative to the working directory.
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
            directory: default_log_directory(),
        }
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_log_directory() -> String {
    DEFAULT_LOG_DIRECTORY.to_string()
}

/// Raw deserialization target for homeval.toml.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    service: ServiceConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/homeval.toml` under `base_dir`.
///
/// `api_url_override`, when `Some` and non-blank, replaces
/// `service.base_url` before validation. Does not copy defaults; prefer
/// [`load_config`].
pub fn load_config_from(
    base_dir: &Path,
    api_url_override: Option<String>,
) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let mut service = file.service;
    if let Some(url) = api_url_override.filter(|u| !u.trim().is_empty()) {
        service.base_url = url;
    }

    let mut config = Config {
        service,
        logging: file.logging,
    };

    validate(&mut config)?;

    Ok(config)
}

/// Seed `config/homeval.toml` from `defaults/homeval.toml` on first run.
///
/// Returns the path written, or `None` when the user's file already exists.
/// An existing file is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let copy_error = |message: String| ConfigError::DefaultsCopyError { message };

    let content = std::fs::read(&source).map_err(|e| {
        copy_error(format!(
            "no config/{CONFIG_FILE} and cannot read {}: {e}; \
             run from the project root or ensure defaults/ is present",
            source.display()
        ))
    })?;

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| copy_error(format!("failed to create {}: {e}", parent.display())))?;
    }

    // create_new so a file written concurrently is left alone
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(copy_error(format!(
                "failed to create {}: {e}",
                target.display()
            )))
        }
    };
    std::io::Write::write_all(&mut dest, &content)
        .map_err(|e| copy_error(format!("failed to write {}: {e}", target.display())))?;

    info!("Copied default configuration to {}", target.display());
    Ok(Some(target))
}

/// Load config relative to the current working directory, copying defaults
/// first and applying `HOMEVAL_API_URL`. Call once at startup.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd, std::env::var(API_URL_ENV).ok())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &mut Config) -> Result<(), ConfigError> {
    let base_url = config.service.base_url.trim().trim_end_matches('/');
    if base_url.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "service.base_url".into(),
            message: format!("must be set (in config or via {API_URL_ENV})"),
        });
    }

    let parsed = reqwest::Url::parse(base_url).map_err(|e| ConfigError::ValidationError {
        field: "service.base_url".into(),
        message: format!("not a valid URL ({e}): {base_url}"),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError {
            field: "service.base_url".into(),
            message: format!("scheme must be http or https, got {}", parsed.scheme()),
        });
    }
    config.service.base_url = base_url.to_string();

    if config.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

//! Effective configuration with provenance
//!
//! Built-in defaults, an optional TOML file and CLI overrides are merged
//! as JSON values, then deserialized into [`ServerConfig`]. Each layer that
//! contributed is recorded as a [`ConfigSource`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Directory name under the user config root
const CONFIG_DIR: &str = "swift-devtools-mcp";

/// File name of the user config
const CONFIG_FILE: &str = "config.toml";

/// Errors raised while building the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing config source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub name: String,
    pub version: String,
}

/// `[log]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Tracing filter directive; `RUST_LOG` takes precedence at startup.
    pub filter: String,
}

/// `[xcode]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XcodeConfig {
    /// Bundle identifier matched by the Spotlight query for installations.
    pub bundle_identifier: String,
}

impl Default for XcodeConfig {
    fn default() -> Self {
        Self {
            bundle_identifier: super::defaults::XCODE_BUNDLE_IDENTIFIER.to_string(),
        }
    }
}

/// Typed server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub log: LogSection,
    pub xcode: XcodeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            server: ServerSection {
                name: defaults.server_name,
                version: defaults.server_version,
            },
            log: LogSection {
                filter: defaults.log_filter,
            },
            xcode: XcodeConfig {
                bundle_identifier: defaults.xcode_bundle_identifier,
            },
        }
    }
}

/// Configuration together with the layers it was built from
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub config: ServerConfig,
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build the effective config.
    ///
    /// An explicit `config_path` must exist. Without one, the default user
    /// config is used when present and silently skipped otherwise.
    pub fn build(
        config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: built-in defaults
        layers.push(BuiltinDefaults::default().to_value());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layer 2: config file
        let file = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };
        if let Some(path) = file {
            let (value, digest) = load_toml_file(&path)?;
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 3: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let config: ServerConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        validate(&config)?;

        Ok(Self { config, sources })
    }
}

/// `$XDG_CONFIG_HOME/swift-devtools-mcp/config.toml`, falling back to `~/.config`.
pub fn default_config_path() -> Option<PathBuf> {
    let root = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(root.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load and parse a TOML file, returning the value and digest
fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: format!("invalid UTF-8: {}", e),
    })?;

    let toml_value: toml::Value = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok((toml_to_json(toml_value), digest))
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.server.name.trim().is_empty() {
        return Err(ConfigError::Invalid("server.name must not be empty".to_string()));
    }

    let bundle = &config.xcode.bundle_identifier;
    if bundle.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "xcode.bundle_identifier must not be empty".to_string(),
        ));
    }
    // Embedded in a quoted Spotlight query.
    if bundle.contains('\'') {
        return Err(ConfigError::Invalid(
            "xcode.bundle_identifier must not contain quotes".to_string(),
        ));
    }

    EnvFilter::try_new(&config.log.filter).map_err(|e| {
        ConfigError::Invalid(format!("log.filter '{}': {}", config.log.filter, e))
    })?;

    Ok(())
}

//! Server configuration
//!
//! Three layers, later ones winning:
//! 1. Built-in defaults
//! 2. Config file (`--config`, or `~/.config/swift-devtools-mcp/config.toml`)
//! 3. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::{BuiltinDefaults, XCODE_BUNDLE_IDENTIFIER};
pub use effective::{
    default_config_path, ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, LogSection,
    ServerConfig, ServerSection, XcodeConfig,
};
pub use merge::{deep_merge, merge_layers};

//! Built-in defaults (layer 1)
//!
//! Hardcoded defaults for all configuration values.

use serde::{Deserialize, Serialize};

/// Bundle identifier Spotlight uses for Xcode.app.
pub const XCODE_BUNDLE_IDENTIFIER: &str = "com.apple.dt.Xcode";

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Name reported in the initialize handshake
    pub server_name: String,

    /// Version reported in the initialize handshake
    pub server_version: String,

    /// Tracing filter directive (default: "info")
    pub log_filter: String,

    /// Bundle identifier used to discover Xcode installations
    pub xcode_bundle_identifier: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            server_name: "Swift Dev Tools Server".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            log_filter: "info".to_string(),
            xcode_bundle_identifier: XCODE_BUNDLE_IDENTIFIER.to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "server": {
                "name": self.server_name,
                "version": self.server_version
            },
            "log": {
                "filter": self.log_filter
            },
            "xcode": {
                "bundle_identifier": self.xcode_bundle_identifier
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.server_name, "Swift Dev Tools Server");
        assert_eq!(defaults.server_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(defaults.log_filter, "info");
        assert_eq!(defaults.xcode_bundle_identifier, "com.apple.dt.Xcode");
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();

        assert_eq!(value["server"]["name"], "Swift Dev Tools Server");
        assert_eq!(value["log"]["filter"], "info");
        assert_eq!(value["xcode"]["bundle_identifier"], "com.apple.dt.Xcode");
    }
}

//! Application configuration.
//!
//! Settings come from an optional `tro.toml` file and are then overridden by
//! environment variables:
//!
//! | Variable              | Setting                     |
//! |-----------------------|-----------------------------|
//! | `TRO_CONFIG`          | explicit path to the file   |
//! | `HOST`                | `server.host`               |
//! | `PORT`                | `server.port`               |
//! | `TRO_MAX_UPLOAD_MB`   | `server.max_upload_mb`      |
//! | `TRO_PRIORITY`        | `coverage.priority`         |
//! | `TRO_THRESHOLDS`      | `coverage.thresholds`       |
//! | `TRO_EXPORT_FILENAME` | `coverage.export_filename`  |

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoverageError, CoverageResult};
use crate::models::{PriorityMetric, Thresholds};

/// Name of the configuration file searched in the default locations.
pub const CONFIG_FILE_NAME: &str = "tro.toml";

/// Default name of the combined export.
pub const DEFAULT_EXPORT_FILENAME: &str = "traffic_revenue_analysis.csv";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub coverage: CoverageSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upload size limit in megabytes.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

/// Grouping defaults used when a request does not say otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSettings {
    #[serde(default)]
    pub priority: PriorityMetric,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default = "default_export_filename")]
    pub export_filename: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_mb() -> usize {
    50
}

fn default_export_filename() -> String {
    DEFAULT_EXPORT_FILENAME.to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            priority: PriorityMetric::default(),
            thresholds: Thresholds::default(),
            export_filename: default_export_filename(),
        }
    }
}

impl ServerSettings {
    /// Upload size limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// `host:port` bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> CoverageResult<Self> {
        toml::from_str(content)
            .map_err(|e| CoverageError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoverageResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            CoverageError::config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `tro.toml` from the first default location that has one.
    ///
    /// Searches, in order:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when no file exists.
    pub fn from_default_location() -> CoverageResult<Option<Self>> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            Path::new("backend").join(CONFIG_FILE_NAME),
            Path::new("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// File configuration (explicit `TRO_CONFIG`, default location or
    /// built-in defaults) with environment overrides applied.
    pub fn load() -> CoverageResult<Self> {
        let mut config = match std::env::var("TRO_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override settings from a variable lookup such as the process
    /// environment. Unset variables leave the setting untouched.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CoverageResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(limit) = lookup("TRO_MAX_UPLOAD_MB") {
            self.server.max_upload_mb = parse_var("TRO_MAX_UPLOAD_MB", &limit)?;
        }
        if let Some(priority) = lookup("TRO_PRIORITY") {
            self.coverage.priority = parse_var("TRO_PRIORITY", &priority)?;
        }
        if let Some(thresholds) = lookup("TRO_THRESHOLDS") {
            self.coverage.thresholds = parse_var("TRO_THRESHOLDS", &thresholds)?;
        }
        if let Some(filename) = lookup("TRO_EXPORT_FILENAME") {
            self.coverage.export_filename = filename;
        }

        debug!("Effective configuration: {:?}", self);
        Ok(())
    }
}

fn parse_var<T>(key: &str, value: &str) -> CoverageResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CoverageError::config(format!("Invalid {}='{}': {}", key, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.server.max_upload_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.coverage.priority, PriorityMetric::Revenue);
        assert_eq!(config.coverage.thresholds.as_slice(), &[20, 40, 60, 80, 100]);
        assert_eq!(config.coverage.export_filename, "traffic_revenue_analysis.csv");
    }

    #[test]
    fn test_parse_partial_file() {
        let toml = r#"
[server]
port = 9000

[coverage]
priority = "traffic"
thresholds = [50, 100]
"#;

        let config = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.coverage.priority, PriorityMetric::Traffic);
        assert_eq!(config.coverage.thresholds.as_slice(), &[50, 100]);
        assert_eq!(config.coverage.export_filename, DEFAULT_EXPORT_FILENAME);
    }

    #[test]
    fn test_invalid_thresholds_in_file() {
        let toml = r#"
[coverage]
thresholds = [40, 20, 100]
"#;
        let err = AppConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, CoverageError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[
                ("HOST", "127.0.0.1"),
                ("PORT", "3000"),
                ("TRO_PRIORITY", "Traffic"),
                ("TRO_THRESHOLDS", "10, 50,100"),
                ("TRO_MAX_UPLOAD_MB", "5"),
                ("TRO_EXPORT_FILENAME", "out.csv"),
            ]))
            .unwrap();

        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.server.max_upload_mb, 5);
        assert_eq!(config.coverage.priority, PriorityMetric::Traffic);
        assert_eq!(config.coverage.thresholds.as_slice(), &[10, 50, 100]);
        assert_eq!(config.coverage.export_filename, "out.csv");
    }

    #[test]
    fn test_invalid_override() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(lookup(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = config
            .apply_overrides(lookup(&[("TRO_PRIORITY", "clicks")]))
            .unwrap_err();
        assert!(matches!(err, CoverageError::Config(_)));
    }
}

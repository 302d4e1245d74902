//! docscan_options: `docscan.json` parsing.
//!
//! The configuration maps top-level module names to directories under a base
//! URL, and lists path segments to leave out when discovering source files.
//!
//! ```json
//! {
//!   "baseUrl": "/mnt/devel/web/dojo-trunk/",
//!   "moduleMap": { "dojo": "dojo", "dijit": "dijit", "dojox": "dojox" },
//!   "exclude": ["tests"]
//! }
//! ```

use docscan_diagnostics::{messages, Diagnostic};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "docscan.json";

/// The `docscan.json` file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DocscanConfig {
    /// Prefix joined with each mapped directory. Normally ends with `/`.
    pub base_url: String,
    /// Module name to directory, relative to `base_url`. File order is kept
    /// and the first matching entry wins.
    pub module_map: IndexMap<String, String>,
    /// Path segments (directory or file names) skipped during discovery.
    pub exclude: Vec<String>,
}

impl DocscanConfig {
    /// Whether any module mapping is configured.
    pub fn has_module_map(&self) -> bool {
        !self.module_map.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let file = self.path().display().to_string();
        let diagnostic = match self {
            ConfigError::Read { source, .. } => Diagnostic::new(
                &messages::COULD_NOT_READ_FILE_0_1,
                &[&file, &source.to_string()],
            ),
            ConfigError::Parse { source, .. } => {
                Diagnostic::new(&messages::INVALID_CONFIGURATION_0, &[&source.to_string()])
            }
        };
        diagnostic.with_file(file)
    }
}

/// Parse a configuration from JSON text.
pub fn parse_config(content: &str) -> Result<DocscanConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Read and parse a configuration file.
pub fn load_config_file(path: &Path) -> Result<DocscanConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        modules = config.module_map.len(),
        "loaded configuration"
    );
    Ok(config)
}

/// Resolve the configuration for a run.
///
/// An explicit path must exist. Without one, `docscan.json` in `cwd` is used
/// when present; otherwise the empty configuration applies.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<DocscanConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    let default_path = cwd.join(CONFIG_FILE_NAME);
    if default_path.is_file() {
        return load_config_file(&default_path);
    }
    tracing::debug!("no configuration file, using defaults");
    Ok(DocscanConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"{
                "baseUrl": "/src/",
                "moduleMap": { "dojo": "dojo", "dijit": "dijit" },
                "exclude": ["tests"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "/src/");
        assert_eq!(
            config.module_map.keys().collect::<Vec<_>>(),
            vec!["dojo", "dijit"]
        );
        assert_eq!(config.exclude, vec!["tests"]);
        assert!(config.has_module_map());
    }

    #[test]
    fn test_module_map_keeps_file_order() {
        let config = parse_config(r#"{ "moduleMap": { "z": "z", "a": "a", "m": "m" } }"#).unwrap();
        assert_eq!(
            config.module_map.keys().collect::<Vec<_>>(),
            vec!["z", "a", "m"]
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, DocscanConfig::default());
        assert!(!config.has_module_map());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse_config(r#"{ "baseURL": "/src/" }"#).is_err());
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(parse_config(r#"{ "exclude": "tests" }"#).is_err());
    }

    #[test]
    fn test_serialize_camel_case() {
        let mut config = DocscanConfig {
            base_url: "/src/".to_string(),
            ..Default::default()
        };
        config.module_map.insert("dojo".to_string(), "dojo".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"baseUrl":"/src/","moduleMap":{"dojo":"dojo"},"exclude":[]}"#
        );
    }

    #[test]
    fn test_load_explicit_and_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "baseUrl": "/x/" }"#).unwrap();

        let explicit = load_config(Some(path.as_path()), Path::new("/nonexistent")).unwrap();
        assert_eq!(explicit.base_url, "/x/");

        let discovered = load_config(None, dir.path()).unwrap();
        assert_eq!(discovered, explicit);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config, DocscanConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load_config(Some(missing.as_path()), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.code, 3001);
        assert!(diagnostic.file.unwrap().ends_with("missing.json"));
    }

    #[test]
    fn test_invalid_json_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.to_diagnostic().code, 3002);
        assert!(err.to_string().starts_with("Invalid configuration in '"));
    }
}

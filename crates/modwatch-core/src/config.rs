//! Configuration file loading and discovery
//!
//! The configuration is a small JSON document. When no path is given on the
//! command line it is searched for as `modwatch.json` in the current working
//! directory, then next to the executable, then as `.modwatch` in the user's
//! home directory.

use crate::errors::ModwatchError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "modwatch.json";
const HOME_CONFIG_FILE_NAME: &str = ".modwatch";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Application client ID sent with every API request.
    pub client_id: String,
    /// OAuth user token, required by Helix and the OAuth token commands.
    #[serde(default)]
    pub oauth_token: Option<String>,
    /// Optional path to a PEM bundle of extra CA roots to trust.
    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,
}

impl Config {
    /// Loads and parses the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self, ModwatchError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ModwatchError::ConfigError(format!(
                "unable to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            ModwatchError::ConfigError(format!(
                "unable to parse configuration file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Loads the configuration from `explicit` if given, otherwise from the
    /// first search-path candidate that exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ModwatchError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        for candidate in Self::candidates() {
            if candidate.is_file() {
                log::debug!("using configuration file {}", candidate.display());
                return Self::load(&candidate);
            }
        }
        Err(ModwatchError::ConfigError(
            "no configuration file found (looked for 'modwatch.json' in the \
             current directory and next to the executable, and '.modwatch' \
             in the home directory)"
                .into(),
        ))
    }

    fn candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(cwd) = env::current_dir() {
            candidates.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Ok(exe) = env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join(CONFIG_FILE_NAME));
            }
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(HOME_CONFIG_FILE_NAME));
        }
        candidates
    }

    /// Reads the configured CA bundle into memory, if one is configured.
    pub fn ca_bundle_bytes(&self) -> Result<Option<Vec<u8>>, ModwatchError> {
        match &self.ca_bundle {
            Some(path) => {
                let bytes = fs::read(path).map_err(|e| {
                    ModwatchError::ConfigError(format!(
                        "unable to read CA bundle '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(Some(bytes))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_parses_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modwatch.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"clientId": "abc123", "oauthToken": "tok", "caBundle": "/tmp/roots.pem"}}"#
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.client_id, "abc123");
        assert_eq!(config.oauth_token.as_deref(), Some("tok"));
        assert_eq!(config.ca_bundle.as_deref(), Some(Path::new("/tmp/roots.pem")));
    }

    #[test]
    fn load_tolerates_missing_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modwatch.json");
        fs::write(&path, r#"{"clientId": "abc123"}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.client_id, "abc123");
        assert!(config.oauth_token.is_none());
        assert!(config.ca_bundle.is_none());
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modwatch.json");
        fs::write(&path, "not json").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ModwatchError::ConfigError(_)));
    }

    #[test]
    fn discover_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"clientId": "explicit"}"#).unwrap();
        let config = Config::discover(Some(&path)).unwrap();
        assert_eq!(config.client_id, "explicit");
    }

    #[test]
    fn discover_fails_for_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(Config::discover(Some(&path)).is_err());
    }
}

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

pub const APP_NAME: &str = "garagectl";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_SCHEME: &str = "https";

pub const HOST_ENV: &str = "GARAGE_HOST";
pub const SCHEME_ENV: &str = "GARAGE_SCHEME";
pub const TOKEN_ENV: &str = "GARAGE_TOKEN";

/// Where and how to reach the admin API.
///
/// Built once by the embedding process and handed to the client; nothing
/// here is stored as ambient state.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// `host[:port]` of the admin endpoint
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Admin bearer token
    #[serde(default)]
    pub token: String,
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            scheme: default_scheme(),
            token: String::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("scheme", &self.scheme)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Config {
    pub fn new(host: impl Into<String>, scheme: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            scheme: scheme.into(),
            token: token.into(),
        }
    }

    /// Default location of the config file (`~/.config/garagectl/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Layer explicitly supplied values over this config.
    ///
    /// Empty strings count as not supplied.
    pub fn merge(
        mut self,
        host: Option<String>,
        scheme: Option<String>,
        token: Option<String>,
    ) -> Self {
        if let Some(host) = host.filter(|h| !h.is_empty()) {
            self.host = host;
        }
        if let Some(scheme) = scheme.filter(|s| !s.is_empty()) {
            self.scheme = scheme;
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = token;
        }
        if self.scheme.is_empty() {
            self.scheme = default_scheme();
        }
        self
    }

    /// Fail fast when the endpoint or credential is missing.
    pub fn validate(&self) -> Result<(), Error> {
        if self.host.trim().is_empty() {
            return Err(Error::MissingConfiguration("host"));
        }
        if self.token.trim().is_empty() {
            return Err(Error::MissingConfiguration("token"));
        }
        match self.scheme.as_str() {
            "http" | "https" => Ok(()),
            other => Err(Error::InvalidConfiguration(format!(
                "unsupported scheme '{}'",
                other
            ))),
        }
    }

    pub fn base_url(&self) -> Result<Url, Error> {
        self.validate()?;
        Ok(Url::parse(&format!("{}://{}/", self.scheme, self.host))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_host_and_token() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfiguration("host"))
        ));

        let config = Config::default().merge(Some("localhost:3903".into()), None, None);
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfiguration("token"))
        ));

        let config = config.merge(None, None, Some("s3cr3t".into()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url() {
        let config = Config::new("localhost:3903", "http", "t");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "http://localhost:3903/"
        );
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        let config = Config::new("localhost:3903", "ftp", "t");
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_merge_prefers_explicit_values() {
        let file = Config::new("file-host", "http", "file-token");
        let merged = file.merge(Some("flag-host".into()), Some(String::new()), None);
        assert_eq!(merged.host, "flag-host");
        assert_eq!(merged.scheme, "http");
        assert_eq!(merged.token, "file-token");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "host = \"garage.internal:3903\"\ntoken = \"abc\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.host, "garage.internal:3903");
        assert_eq!(config.scheme, DEFAULT_SCHEME);
        assert_eq!(config.token, "abc");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "host = [").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::new("h", "https", "very-secret");
        assert!(!format!("{:?}", config).contains("very-secret"));
    }
}

//! TOML-based configuration for rhusers.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! usable configuration. The issue-tracker password is never stored in the
//! file: `tracker.password_env` names the environment variable holding it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::directory::mapper::KEY_PLACEHOLDER;
use crate::errors::ConfigError;
use crate::output::OutputFormat;
use crate::pipeline::RecordMode;
use crate::record::{RecordLayout, RecordStyle};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory server and query settings.
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Issue tracker settings. Absent = no enrichment.
    #[serde(default)]
    pub tracker: Option<TrackerConfig>,

    /// Output encoding settings.
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// LDAP directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Server URL or `host:port`.
    #[serde(default = "default_directory_url")]
    pub url: String,

    /// Search base DN for employee queries.
    #[serde(default = "default_base_dn")]
    pub base_dn: String,

    /// Employee filter template; `{}` is replaced by each input key.
    #[serde(default = "default_query")]
    pub query: String,

    /// Optional profile page template; `{}` is replaced by the identifier.
    #[serde(default)]
    pub profile_url: Option<String>,
}

fn default_directory_url() -> String {
    "ldap://ldap.corp.redhat.com:389".into()
}
fn default_base_dn() -> String {
    "ou=users,dc=redhat,dc=com".into()
}
fn default_query() -> String {
    "(uid={})".into()
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: default_directory_url(),
            base_dn: default_base_dn(),
            query: default_query(),
            profile_url: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Issue tracker
// ---------------------------------------------------------------------------

/// Issue tracker (Jira) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Base URL of the Jira instance.
    pub url: String,

    /// Basic-auth username.
    #[serde(default)]
    pub username: String,

    /// Environment variable holding the basic-auth password.
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

fn default_password_env() -> String {
    "RHUSERS_TRACKER_PASSWORD".into()
}

impl TrackerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: String::new(),
            password_env: default_password_env(),
        }
    }

    /// Read the password from `password_env`. Unset and empty both yield
    /// `None`.
    pub fn resolve_password(&self) -> Option<String> {
        match std::env::var(&self.password_env) {
            Ok(val) if !val.is_empty() => {
                debug!(env_name = %self.password_env, "resolved env var");
                Some(val)
            }
            Ok(_) => {
                warn!(env_name = %self.password_env, "env var is set but empty");
                None
            }
            Err(_) => {
                debug!(env_name = %self.password_env, "env var not set");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Output encoding settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Column delimiter.
    #[serde(default)]
    pub format: OutputFormat,

    /// Render profile identifiers and mail addresses as spreadsheet
    /// hyperlinks.
    #[serde(default)]
    pub hyperlinks: bool,
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directory.url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "directory.url".into(),
                detail: "directory URL must not be empty".into(),
            });
        }
        if self.directory.base_dn.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "directory.base_dn".into(),
                detail: "base DN must not be empty".into(),
            });
        }
        if !self.directory.query.contains(KEY_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue {
                field: "directory.query".into(),
                detail: format!("query must contain the '{}' placeholder", KEY_PLACEHOLDER),
            });
        }
        if let Some(ref template) = self.directory.profile_url {
            if !template.contains(KEY_PLACEHOLDER) {
                return Err(ConfigError::InvalidValue {
                    field: "directory.profile_url".into(),
                    detail: format!(
                        "profile URL must contain the '{}' placeholder",
                        KEY_PLACEHOLDER
                    ),
                });
            }
        }
        if let Some(ref tracker) = self.tracker {
            if reqwest::Url::parse(&tracker.url).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "tracker.url".into(),
                    detail: format!("'{}' is not a valid URL", tracker.url),
                });
            }
        }

        Ok(())
    }

    /// The builder/formatter pair selected by this configuration.
    pub fn record_mode(&self) -> RecordMode {
        RecordMode {
            layout: if self.tracker.is_some() {
                RecordLayout::Augmented
            } else {
                RecordLayout::Minimal
            },
            style: if self.output.hyperlinks {
                RecordStyle::Hyperlinked
            } else {
                RecordStyle::Plain
            },
        }
    }
}

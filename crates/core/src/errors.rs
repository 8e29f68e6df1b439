//! Error types for the rhusers core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

// ---------------------------------------------------------------------------
// Directory errors
// ---------------------------------------------------------------------------

/// Errors from directory lookups and the mapping of directory entries.
///
/// Schema violations and manager-resolution failures indicate inconsistent
/// directory data; they are never retried.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// An attribute expected to be single-valued carried several values.
    #[error("attribute {attribute}: too many values ({count})")]
    AttributeCardinality { attribute: String, count: usize },

    /// A manager reference without the `<filter>,<base dn>` shape.
    #[error("manager identity {0}: malformed reference")]
    MalformedManagerReference(String),

    /// The manager search returned no entries.
    #[error("manager search {0}: no entries found")]
    ManagerNotFound(String),

    /// The manager search returned more than one entry.
    #[error("manager search {reference}: too many entries found ({count})")]
    ManagerAmbiguous { reference: String, count: usize },

    /// Could not reach the directory server.
    #[error("directory connection failed: {0}")]
    Connection(String),

    /// Protocol or server-side failure reported by the LDAP client.
    #[error("LDAP error: {0}")]
    Ldap(#[from] ldap3::LdapError),
}

// ---------------------------------------------------------------------------
// Issue tracker errors
// ---------------------------------------------------------------------------

/// Errors from the issue-tracker account lookup.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// HTTP-level transport error (network, TLS, etc.).
    #[error("issue tracker HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Credentials were rejected.
    #[error("issue tracker authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned a non-success status code.
    #[error("request failed (HTTP {status}): {body}")]
    ApiError { status: u16, body: String },

    /// JSON deserialization failure.
    #[error("issue tracker response parse error: {0}")]
    ParseError(String),

    /// The configured base URL cannot be used to build request or profile URLs.
    #[error("invalid issue tracker URL '{0}'")]
    InvalidUrl(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

/// Errors from writing rendered rows.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("row encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("output I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

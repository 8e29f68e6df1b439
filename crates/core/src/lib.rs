//! rhusers core library.
//!
//! This crate resolves employee records from an LDAP directory, optionally
//! enriches them with an issue-tracker profile, and projects them into
//! fixed-width rows rendered as plain text or spreadsheet hyperlinks.

pub mod config;
pub mod directory;
pub mod errors;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod tracker;

// Re-exports for convenience.
pub use config::AppConfig;
pub use directory::{EmployeeMapper, LdapDirectory};
pub use models::{Employee, Profile};
pub use pipeline::{Pipeline, RecordMode};
pub use tracker::JiraClient;

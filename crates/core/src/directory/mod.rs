//! Employee resolution against an LDAP directory.
//!
//! The resolution flow for one search key is:
//! 1. Search the configured base DN with the employee query
//! 2. Flatten each entry into single-valued attributes
//! 3. Resolve the manager reference with a follow-up search (memoized)
//! 4. Assemble an [`Employee`](crate::models::Employee)

pub mod attributes;
pub mod ldap;
pub mod manager;
pub mod mapper;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::BTreeMap;
use std::future::Future;

use crate::errors::DirectoryError;

pub use attributes::{preferred_mail, AttributeMap};
pub use ldap::LdapDirectory;
pub use manager::ManagerResolver;
pub use mapper::EmployeeMapper;

pub const ATTR_UID: &str = "uid";
pub const ATTR_DISPLAY_NAME: &str = "displayName";
pub const ATTR_SURNAME: &str = "sn";
pub const ATTR_PRIMARY_MAIL: &str = "rhatPrimaryMail";
pub const ATTR_PREFERRED_ALIAS: &str = "rhatPreferredAlias";
pub const ATTR_JOB_TITLE: &str = "rhatJobTitle";
pub const ATTR_GEO: &str = "rhatGeo";
pub const ATTR_LOCATION: &str = "rhatLocation";
pub const ATTR_COST_CENTER: &str = "rhatCostCenterDesc";
pub const ATTR_COMPONENT: &str = "rhatRnDComponent";
pub const ATTR_SUBPRODUCT: &str = "rhatSubproduct";
pub const ATTR_MANAGER: &str = "manager";

/// Attributes requested by the employee query.
pub const EMPLOYEE_ATTRIBUTES: &[&str] = &[
    ATTR_UID,
    ATTR_DISPLAY_NAME,
    ATTR_SURNAME,
    ATTR_PRIMARY_MAIL,
    ATTR_PREFERRED_ALIAS,
    ATTR_JOB_TITLE,
    ATTR_GEO,
    ATTR_LOCATION,
    ATTR_COST_CENTER,
    ATTR_COMPONENT,
    ATTR_SUBPRODUCT,
    ATTR_MANAGER,
];

/// Attributes requested when resolving a manager.
pub const MANAGER_MAIL_ATTRIBUTES: &[&str] = &[ATTR_PRIMARY_MAIL, ATTR_PREFERRED_ALIAS];

/// Search scope for directory queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// The base object and everything below it.
    Subtree,
}

/// One entry returned by a directory search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub dn: String,
    /// Attribute name -> values, ordered by name.
    pub attrs: BTreeMap<String, Vec<String>>,
}

impl DirectoryEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style helper to append an attribute.
    pub fn with_attr<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }
}

/// The directory search operation the resolver depends on.
///
/// Searches never dereference aliases and carry no size or time limit.
/// Transport errors are returned unmodified.
pub trait DirectorySearch {
    fn search(
        &self,
        base_dn: &str,
        filter: &str,
        scope: SearchScope,
        attributes: &[&str],
    ) -> impl Future<Output = Result<Vec<DirectoryEntry>, DirectoryError>>;
}

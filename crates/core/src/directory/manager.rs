//! Manager mail resolution with a per-run cache.
//!
//! A manager reference is the `manager` attribute of an employee entry, in
//! the form `<filter fragment>,<base dn>` (e.g.
//! `uid=boss,ou=users,dc=example,dc=com`). Resolving it costs one subtree
//! search under the base DN; the result is memoized by the raw reference so
//! each distinct manager is looked up at most once per resolver.

use std::collections::HashMap;

use tracing::debug;

use super::attributes::{preferred_mail, AttributeMap};
use super::{DirectorySearch, SearchScope, MANAGER_MAIL_ATTRIBUTES};
use crate::errors::DirectoryError;

/// Resolves manager references to their preferred mail address.
///
/// The cache is never evicted; it is bounded by the number of distinct
/// managers seen during one run. Exclusive access through `&mut self` keeps
/// lookups for the same reference from racing.
#[derive(Debug, Default)]
pub struct ManagerResolver {
    cache: HashMap<String, String>,
}

impl ManagerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `reference` to the manager's preferred mail address.
    pub async fn resolve<D: DirectorySearch>(
        &mut self,
        directory: &D,
        reference: &str,
    ) -> Result<String, DirectoryError> {
        if let Some(mail) = self.cache.get(reference) {
            debug!(reference, "manager cache hit");
            return Ok(mail.clone());
        }

        let (fragment, base_dn) = split_reference(reference)?;
        let filter = format!("({})", fragment);
        debug!(reference, %filter, base_dn, "manager cache miss, searching directory");

        let entries = directory
            .search(base_dn, &filter, SearchScope::Subtree, MANAGER_MAIL_ATTRIBUTES)
            .await?;

        let entry = match entries.as_slice() {
            [entry] => entry,
            [] => return Err(DirectoryError::ManagerNotFound(reference.to_string())),
            _ => {
                return Err(DirectoryError::ManagerAmbiguous {
                    reference: reference.to_string(),
                    count: entries.len(),
                })
            }
        };

        let mail = preferred_mail(&AttributeMap::from_entry(entry)?);
        self.cache.insert(reference.to_string(), mail.clone());
        Ok(mail)
    }

    /// The cached mail for `reference`, if it has been resolved.
    pub fn cached(&self, reference: &str) -> Option<&str> {
        self.cache.get(reference).map(String::as_str)
    }

    /// Number of distinct managers resolved so far.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

/// Split a manager reference on its first comma.
fn split_reference(reference: &str) -> Result<(&str, &str), DirectoryError> {
    reference
        .split_once(',')
        .ok_or_else(|| DirectoryError::MalformedManagerReference(reference.to_string()))
}

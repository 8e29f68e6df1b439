//! Mapping of employee directory entries into [`Employee`] values.

use tracing::{debug, instrument};

use super::attributes::AttributeMap;
use super::manager::ManagerResolver;
use super::{
    DirectoryEntry, DirectorySearch, SearchScope, ATTR_COMPONENT, ATTR_COST_CENTER,
    ATTR_DISPLAY_NAME, ATTR_GEO, ATTR_JOB_TITLE, ATTR_LOCATION, ATTR_MANAGER,
    ATTR_PREFERRED_ALIAS, ATTR_PRIMARY_MAIL, ATTR_SUBPRODUCT, ATTR_SURNAME, ATTR_UID,
    EMPLOYEE_ATTRIBUTES,
};
use crate::errors::DirectoryError;
use crate::models::{Employee, Profile};

/// Placeholder replaced by the search key in query and link templates.
pub const KEY_PLACEHOLDER: &str = "{}";

/// Searches employees and maps each matching entry into an [`Employee`].
///
/// Owns the directory handle and the manager cache for one run. Errors from
/// attribute extraction or manager resolution are propagated as-is; the
/// caller decides whether the batch continues.
pub struct EmployeeMapper<D> {
    directory: D,
    managers: ManagerResolver,
    base_dn: String,
    query: String,
    profile_url: Option<String>,
}

impl<D: DirectorySearch> EmployeeMapper<D> {
    /// `query` is an LDAP filter template where `{}` stands for the key.
    pub fn new(directory: D, base_dn: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            directory,
            managers: ManagerResolver::new(),
            base_dn: base_dn.into(),
            query: query.into(),
            profile_url: None,
        }
    }

    /// Attach a directory profile link template (`{}` = identifier) to the
    /// identifier of every mapped employee.
    pub fn with_profile_url(mut self, template: Option<String>) -> Self {
        self.profile_url = template;
        self
    }

    /// The search filter for `key`.
    pub fn filter_for(&self, key: &str) -> String {
        self.query.replace(KEY_PLACEHOLDER, key)
    }

    /// Search employees matching `key`. Zero matches is an empty list, not
    /// an error.
    #[instrument(skip(self))]
    pub async fn search_employees(&mut self, key: &str) -> Result<Vec<Employee>, DirectoryError> {
        let filter = self.filter_for(key);
        let entries = self
            .directory
            .search(&self.base_dn, &filter, SearchScope::Subtree, EMPLOYEE_ATTRIBUTES)
            .await?;
        debug!(%filter, count = entries.len(), "employee search completed");

        let mut employees = Vec::with_capacity(entries.len());
        for entry in &entries {
            employees.push(self.map_entry(entry).await?);
        }
        Ok(employees)
    }

    /// Map one employee entry, resolving its manager.
    pub async fn map_entry(&mut self, entry: &DirectoryEntry) -> Result<Employee, DirectoryError> {
        let attrs = AttributeMap::from_entry(entry)?;

        let manager_mail = self
            .managers
            .resolve(&self.directory, attrs.get(ATTR_MANAGER).unwrap_or_default())
            .await?;

        let uid = attrs.value(ATTR_UID);
        let link = match &self.profile_url {
            Some(template) if !uid.is_empty() => Some(template.replace(KEY_PLACEHOLDER, &uid)),
            _ => None,
        };

        Ok(Employee {
            user_id: Profile::new(uid, link),
            tracker_id: None,
            first_name: attrs.value(ATTR_DISPLAY_NAME),
            last_name: attrs.value(ATTR_SURNAME),
            mail: mail_candidates(&attrs),
            job_title: attrs.value(ATTR_JOB_TITLE),
            geo_area: attrs.value(ATTR_GEO),
            location: attrs.value(ATTR_LOCATION),
            cost_center: attrs.value(ATTR_COST_CENTER),
            component: attrs.value(ATTR_COMPONENT),
            subproduct: attrs.value(ATTR_SUBPRODUCT),
            manager_mail,
        })
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn managers(&self) -> &ManagerResolver {
        &self.managers
    }

    pub fn into_directory(self) -> D {
        self.directory
    }
}

/// Preferred alias first, then primary mail. Identical addresses are kept.
fn mail_candidates(attrs: &AttributeMap) -> Vec<String> {
    [ATTR_PREFERRED_ALIAS, ATTR_PRIMARY_MAIL]
        .iter()
        .filter_map(|name| attrs.non_empty(name))
        .map(str::to_string)
        .collect()
}

//! LDAP transport for [`DirectorySearch`], backed by the `ldap3` crate.

use std::collections::BTreeMap;

use ldap3::{DerefAliases, Ldap, LdapConnAsync, Scope, SearchEntry, SearchOptions};
use tracing::{debug, info, instrument, warn};

use super::{DirectoryEntry, DirectorySearch, SearchScope};
use crate::errors::DirectoryError;

/// An anonymous LDAP session.
///
/// The connection driver runs on the tokio runtime; the [`Ldap`] handle is
/// cloned per search since `ldap3` operations take `&mut self`.
pub struct LdapDirectory {
    url: String,
    ldap: Ldap,
}

impl LdapDirectory {
    /// Connect to `address`, either an `ldap://`/`ldaps://` URL or a bare
    /// `host:port` (plain LDAP assumed).
    pub async fn connect(address: &str) -> Result<Self, DirectoryError> {
        let url = normalize_url(address);
        debug!(url = %url, "connecting to LDAP server");

        let (conn, ldap) = LdapConnAsync::new(&url).await.map_err(|e| {
            DirectoryError::Connection(format!("failed to connect to {}: {}", url, e))
        })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        info!(url = %url, "connected to LDAP server");
        Ok(Self { url, ldap })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Close the session.
    pub async fn disconnect(mut self) -> Result<(), DirectoryError> {
        self.ldap.unbind().await?;
        debug!(url = %self.url, "disconnected from LDAP server");
        Ok(())
    }
}

impl DirectorySearch for LdapDirectory {
    #[instrument(skip(self, attributes), fields(url = %self.url))]
    async fn search(
        &self,
        base_dn: &str,
        filter: &str,
        scope: SearchScope,
        attributes: &[&str],
    ) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        let options = SearchOptions::new()
            .deref(DerefAliases::Never)
            .sizelimit(0)
            .timelimit(0);

        let mut ldap = self.ldap.clone();
        let (entries, _) = ldap
            .with_search_options(options)
            .search(base_dn, ldap_scope(scope), filter, attributes.to_vec())
            .await?
            .success()?;

        debug!(count = entries.len(), "LDAP search returned");
        Ok(entries
            .into_iter()
            .map(|e| into_entry(SearchEntry::construct(e)))
            .collect())
    }
}

fn ldap_scope(scope: SearchScope) -> Scope {
    match scope {
        SearchScope::Subtree => Scope::Subtree,
    }
}

fn into_entry(entry: SearchEntry) -> DirectoryEntry {
    DirectoryEntry {
        dn: entry.dn,
        attrs: entry.attrs.into_iter().collect::<BTreeMap<_, _>>(),
    }
}

fn normalize_url(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("ldap://{}", address)
    }
}

//! In-memory directory used by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{DirectoryEntry, DirectorySearch, SearchScope};
use crate::errors::DirectoryError;

#[derive(Debug, Clone)]
pub struct SearchCall {
    pub base_dn: String,
    pub filter: String,
    pub attributes: Vec<String>,
}

/// Answers searches by exact filter match; unknown filters return no entries.
#[derive(Debug, Default)]
pub struct MockDirectory {
    results: HashMap<String, Vec<DirectoryEntry>>,
    calls: RefCell<Vec<SearchCall>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, filter: &str, entries: Vec<DirectoryEntry>) -> Self {
        self.results.insert(filter.to_string(), entries);
        self
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl DirectorySearch for MockDirectory {
    async fn search(
        &self,
        base_dn: &str,
        filter: &str,
        _scope: SearchScope,
        attributes: &[&str],
    ) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        self.calls.borrow_mut().push(SearchCall {
            base_dn: base_dn.to_string(),
            filter: filter.to_string(),
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
        });
        Ok(self.results.get(filter).cloned().unwrap_or_default())
    }
}

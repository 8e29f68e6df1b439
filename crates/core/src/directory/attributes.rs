//! Flattening of directory entries into single-valued attribute maps.

use std::collections::BTreeMap;

use super::{DirectoryEntry, ATTR_PREFERRED_ALIAS, ATTR_PRIMARY_MAIL};
use crate::errors::DirectoryError;

/// Attribute name -> single value, scoped to the processing of one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap(BTreeMap<String, String>);

impl AttributeMap {
    /// Flatten `entry`, failing on the first attribute that carries more
    /// than one value.
    ///
    /// Attributes returned without any value are treated as absent.
    pub fn from_entry(entry: &DirectoryEntry) -> Result<Self, DirectoryError> {
        let mut map = BTreeMap::new();

        for (name, values) in &entry.attrs {
            match values.as_slice() {
                [] => continue,
                [value] => {
                    map.insert(name.clone(), value.clone());
                }
                _ => {
                    return Err(DirectoryError::AttributeCardinality {
                        attribute: name.clone(),
                        count: values.len(),
                    })
                }
            }
        }

        Ok(Self(map))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The value of `name`, or empty when absent.
    pub fn value(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// The value of `name` when present and non-empty.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Pick the preferred contact address: the alias when set, else the primary
/// mail (possibly empty).
pub fn preferred_mail(attrs: &AttributeMap) -> String {
    attrs
        .non_empty(ATTR_PREFERRED_ALIAS)
        .map(str::to_string)
        .unwrap_or_else(|| attrs.value(ATTR_PRIMARY_MAIL))
}

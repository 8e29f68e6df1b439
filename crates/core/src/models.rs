//! Employee entity shared across the directory, tracker, and record layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An identifier with an optional navigable link (directory profile page,
/// issue-tracker profile view).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub text: String,
    pub link: Option<String>,
}

impl Profile {
    pub fn new(text: impl Into<String>, link: Option<String>) -> Self {
        Self {
            text: text.into(),
            link,
        }
    }

    /// A profile with display text but no link.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One resolved directory principal.
///
/// `mail` is ordered by preference: index 0 is the address used for output
/// and the first one tried against the issue tracker.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub user_id: Profile,
    /// Issue-tracker profile; `None` until the enrichment stage has run.
    pub tracker_id: Option<Profile>,
    pub first_name: String,
    pub last_name: String,
    pub mail: Vec<String>,
    pub job_title: String,
    pub geo_area: String,
    pub location: String,
    pub cost_center: String,
    pub component: String,
    pub subproduct: String,
    pub manager_mail: String,
}

impl Employee {
    /// Full name, or empty unless both first and last name are present.
    pub fn full_name(&self) -> String {
        if !self.first_name.is_empty() && !self.last_name.is_empty() {
            return format!("{} {}", self.first_name, self.last_name);
        }
        String::new()
    }

    /// The most preferred mail address, or empty when there is none.
    pub fn preferred_mail(&self) -> &str {
        self.mail.first().map(String::as_str).unwrap_or("")
    }
}

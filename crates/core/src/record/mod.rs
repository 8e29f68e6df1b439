//! Projection of an [`Employee`] into an ordered list of typed fields.
//!
//! Column order is part of the output contract; consumers map columns by
//! position.
//!
//! | #  | Minimal        | Augmented        |
//! |----|----------------|------------------|
//! | 1  | identifier     | identifier       |
//! | 2  | full name      | full name        |
//! | 3  | preferred mail | preferred mail   |
//! | 4  | job title      | job title        |
//! | 5  | geo area       | geo area         |
//! | 6  | location       | location         |
//! | 7  | cost center    | cost center      |
//! | 8  | component      | component        |
//! | 9  | sub-product    | sub-product      |
//! | 10 | manager mail   | tracker profile  |
//! | 11 |                | manager mail     |

pub mod format;

use serde::{Deserialize, Serialize};

use crate::models::{Employee, Profile};

pub use format::{format_record, RecordStyle};

/// One typed column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Text(String),
    /// An identifier with an optional profile link.
    LinkedIdentifier { text: String, link: Option<String> },
    /// A mail address, linkable through `mailto:`.
    LinkedMail(String),
    /// A value with no text form; rendered as a placeholder.
    Unrenderable,
}

impl Field {
    pub fn text(value: impl Into<String>) -> Self {
        Field::Text(value.into())
    }

    pub fn mail(address: impl Into<String>) -> Self {
        Field::LinkedMail(address.into())
    }
}

impl From<&Profile> for Field {
    fn from(profile: &Profile) -> Self {
        Field::LinkedIdentifier {
            text: profile.text.clone(),
            link: profile.link.clone(),
        }
    }
}

pub type Record = Vec<Field>;

/// Which columns a record carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLayout {
    /// Directory columns only.
    #[default]
    Minimal,
    /// Directory columns plus the issue-tracker profile.
    Augmented,
}

impl RecordLayout {
    /// Number of columns every record of this layout has.
    pub fn width(self) -> usize {
        match self {
            RecordLayout::Minimal => 10,
            RecordLayout::Augmented => 11,
        }
    }

    pub fn build(self, employee: &Employee) -> Record {
        match self {
            RecordLayout::Minimal => build_minimal(employee),
            RecordLayout::Augmented => build_augmented(employee),
        }
    }
}

fn base_fields(e: &Employee) -> Record {
    vec![
        Field::from(&e.user_id),
        Field::text(e.full_name()),
        Field::mail(e.preferred_mail()),
        Field::text(e.job_title.as_str()),
        Field::text(e.geo_area.as_str()),
        Field::text(e.location.as_str()),
        Field::text(e.cost_center.as_str()),
        Field::text(e.component.as_str()),
        Field::text(e.subproduct.as_str()),
    ]
}

pub fn build_minimal(e: &Employee) -> Record {
    let mut record = base_fields(e);
    record.push(Field::mail(e.manager_mail.as_str()));
    record
}

/// An employee that was never enriched gets an empty tracker column.
pub fn build_augmented(e: &Employee) -> Record {
    let mut record = base_fields(e);
    let tracker = e.tracker_id.clone().unwrap_or_default();
    record.push(Field::from(&tracker));
    record.push(Field::mail(e.manager_mail.as_str()));
    record
}

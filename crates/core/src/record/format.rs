//! Rendering of records into output cells.

use serde::{Deserialize, Serialize};

use super::Field;

/// Text rendered for a field that has no text form.
pub const UNKNOWN_FIELD: &str = "<unknown>";

/// How fields are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStyle {
    /// Bare text; links are dropped.
    #[default]
    Plain,
    /// Spreadsheet `=HYPERLINK(...)` formulas for linked identifiers and
    /// mail addresses.
    Hyperlinked,
}

impl RecordStyle {
    pub fn render(self, field: &Field) -> String {
        match self {
            RecordStyle::Plain => render_plain(field),
            RecordStyle::Hyperlinked => render_hyperlinked(field),
        }
    }
}

/// Render every field; the output has the same length as `record`.
pub fn format_record(style: RecordStyle, record: &[Field]) -> Vec<String> {
    record.iter().map(|f| style.render(f)).collect()
}

fn render_plain(field: &Field) -> String {
    match field {
        Field::Text(text) => text.clone(),
        Field::LinkedIdentifier { text, .. } => text.clone(),
        Field::LinkedMail(address) => address.clone(),
        Field::Unrenderable => UNKNOWN_FIELD.to_string(),
    }
}

fn render_hyperlinked(field: &Field) -> String {
    match field {
        Field::LinkedIdentifier {
            text,
            link: Some(link),
        } if !link.is_empty() => sheet_hyperlink(text, link),
        // An empty address stays an empty cell.
        Field::LinkedMail(address) if !address.is_empty() => {
            sheet_hyperlink(address, &format!("mailto:{}", address))
        }
        _ => render_plain(field),
    }
}

/// A spreadsheet hyperlink formula. Embedded quotes are doubled.
pub fn sheet_hyperlink(text: &str, link: &str) -> String {
    format!(
        "=HYPERLINK(\"{}\",\"{}\")",
        link.replace('"', "\"\""),
        text.replace('"', "\"\"")
    )
}

//! End-to-end tests for the resolution pipeline.
//!
//! These tests drive the real `Pipeline` with:
//! - An in-memory directory that counts searches
//! - An in-memory issue tracker keyed by mail address
//!
//! No network I/O.

use std::cell::Cell;
use std::collections::HashMap;

use rhusers_core::directory::{DirectoryEntry, DirectorySearch, EmployeeMapper, SearchScope};
use rhusers_core::errors::{CoreError, DirectoryError, TrackerError};
use rhusers_core::output::{OutputFormat, RowWriter};
use rhusers_core::record::{RecordLayout, RecordStyle};
use rhusers_core::tracker::{Account, AccountLookup};
use rhusers_core::{AppConfig, Pipeline, RecordMode};

// ===========================================================================
// Helpers
// ===========================================================================

const BASE_DN: &str = "ou=users,dc=example,dc=com";
const MANAGER: &str = "uid=boss,ou=users,dc=example,dc=com";

#[derive(Default)]
struct FakeDirectory {
    entries: HashMap<String, Vec<DirectoryEntry>>,
    searches: Cell<usize>,
}

impl FakeDirectory {
    fn with(mut self, filter: &str, entries: Vec<DirectoryEntry>) -> Self {
        self.entries.insert(filter.to_string(), entries);
        self
    }
}

impl DirectorySearch for FakeDirectory {
    async fn search(
        &self,
        _base_dn: &str,
        filter: &str,
        _scope: SearchScope,
        _attributes: &[&str],
    ) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        self.searches.set(self.searches.get() + 1);
        Ok(self.entries.get(filter).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct FakeTracker {
    accounts: HashMap<String, String>,
}

impl AccountLookup for FakeTracker {
    async fn find_account_by_mail(&self, address: &str) -> Result<Option<Account>, TrackerError> {
        Ok(self.accounts.get(address).map(|key| Account {
            key: key.clone(),
            profile_url: format!("https://issues.example.com/ViewProfile.jspa?name={key}"),
        }))
    }
}

fn employee_entry(uid: &str, first: &str, last: &str, mail: &str) -> DirectoryEntry {
    DirectoryEntry::new(format!("uid={uid},{BASE_DN}"))
        .with_attr("uid", [uid])
        .with_attr("displayName", [first])
        .with_attr("sn", [last])
        .with_attr("rhatPrimaryMail", [mail])
        .with_attr("rhatJobTitle", ["Software Engineer"])
        .with_attr("rhatGeo", ["NA"])
        .with_attr("rhatLocation", ["Raleigh"])
        .with_attr("rhatCostCenterDesc", ["Engineering"])
        .with_attr("rhatRnDComponent", ["Platform"])
        .with_attr("rhatSubproduct", ["Kernel"])
        .with_attr("manager", [MANAGER])
}

fn directory() -> FakeDirectory {
    FakeDirectory::default()
        .with("(uid=jane)", vec![employee_entry("jane", "Jane", "Doe", "jane@x")])
        .with("(uid=john)", vec![employee_entry("john", "John", "Roe", "john@x")])
        .with(
            "(uid=boss)",
            vec![DirectoryEntry::new(MANAGER)
                .with_attr("rhatPrimaryMail", ["boss@x"])
                .with_attr("rhatPreferredAlias", ["the.boss@x"])],
        )
}

fn pipeline(
    tracker: Option<FakeTracker>,
    mode: RecordMode,
) -> Pipeline<FakeDirectory, FakeTracker> {
    Pipeline::new(EmployeeMapper::new(directory(), BASE_DN, "(uid={})"), tracker, mode)
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn test_minimal_plain_row() {
    let mut p = pipeline(None, RecordMode::default());
    let rows = p.process("jane").await.unwrap();

    assert_eq!(
        rows,
        vec![vec![
            "jane",
            "Jane Doe",
            "jane@x",
            "Software Engineer",
            "NA",
            "Raleigh",
            "Engineering",
            "Platform",
            "Kernel",
            "the.boss@x",
        ]]
    );
}

#[tokio::test]
async fn test_unknown_key_yields_placeholder_row() {
    for layout in [RecordLayout::Minimal, RecordLayout::Augmented] {
        let mode = RecordMode::new(layout, RecordStyle::Hyperlinked);
        let mut p = pipeline(Some(FakeTracker::default()), mode);

        let rows = p.process("ghost").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), layout.width());
        assert!(rows[0].iter().all(String::is_empty));
    }
}

#[tokio::test]
async fn test_blank_key_skips_directory() {
    let mut p = pipeline(None, RecordMode::default());
    let rows = p.process("   ").await.unwrap();

    assert_eq!(rows, vec![vec![String::new(); 10]]);
    assert_eq!(p.mapper().directory().searches.get(), 0);
}

#[tokio::test]
async fn test_augmented_hyperlinked_row() {
    let tracker = FakeTracker {
        accounts: HashMap::from([("jane@x".to_string(), "JDOE-1".to_string())]),
    };
    let mode = RecordMode::new(RecordLayout::Augmented, RecordStyle::Hyperlinked);
    let mut p = pipeline(Some(tracker), mode);

    let rows = p.process("jane").await.unwrap();
    let row = &rows[0];
    assert_eq!(row.len(), 11);
    assert_eq!(row[0], "jane");
    assert_eq!(row[2], "=HYPERLINK(\"mailto:jane@x\",\"jane@x\")");
    assert!(row[9].contains("JDOE-1"));
    assert!(row[9].contains("https://issues.example.com/ViewProfile.jspa?name=JDOE-1"));
    assert_eq!(row[10], "=HYPERLINK(\"mailto:the.boss@x\",\"the.boss@x\")");
}

#[tokio::test]
async fn test_shared_manager_resolved_once_per_run() {
    let mut p = pipeline(None, RecordMode::default());

    p.process("jane").await.unwrap();
    p.process("john").await.unwrap();
    p.process("jane").await.unwrap();

    // Three employee searches, one manager search.
    assert_eq!(p.mapper().directory().searches.get(), 4);
    assert_eq!(p.mapper().managers().cache_len(), 1);
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let mode = RecordMode::new(RecordLayout::Minimal, RecordStyle::Hyperlinked);
    let mut p = pipeline(None, mode);

    let mut render = Vec::new();
    for _ in 0..2 {
        let mut writer = RowWriter::new(Vec::new(), OutputFormat::Csv);
        for row in p.process("jane").await.unwrap() {
            writer.write_row(&row).unwrap();
        }
        render.push(writer.into_inner().unwrap());
    }
    assert_eq!(render[0], render[1]);
}

#[tokio::test]
async fn test_directory_inconsistency_aborts() {
    let dir = directory().with(
        "(uid=orphan)",
        vec![employee_entry("orphan", "Or", "Phan", "o@x").with_attr("manager", ["uid=gone,dc=x"])],
    );
    let mut p: Pipeline<FakeDirectory, FakeTracker> = Pipeline::new(
        EmployeeMapper::new(dir, BASE_DN, "(uid={})"),
        None,
        RecordMode::default(),
    );

    let err = p.process("orphan").await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Directory(DirectoryError::ManagerNotFound(_))
    ));
}

#[tokio::test]
async fn test_config_drives_mode() {
    let config: AppConfig = toml::from_str(
        r#"
[tracker]
url = "https://issues.example.com"

[output]
hyperlinks = true
"#,
    )
    .unwrap();

    let mode = config.record_mode();
    assert_eq!(mode.width(), 11);
    let mut p = pipeline(Some(FakeTracker::default()), mode);
    let rows = p.process("john").await.unwrap();
    assert_eq!(rows[0].len(), 11);
    // No tracker account: empty profile column.
    assert_eq!(rows[0][9], "");
}

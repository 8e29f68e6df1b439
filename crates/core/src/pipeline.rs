//! Per-key resolution pipeline: directory search, optional issue-tracker
//! enrichment, record projection, and rendering.
//!
//! Keys are processed one at a time to completion. Every key yields at least
//! one row so that output rows line up with input rows.

use tracing::{debug, instrument, warn};

use crate::directory::{DirectorySearch, EmployeeMapper};
use crate::errors::CoreError;
use crate::models::Employee;
use crate::record::{format_record, RecordLayout, RecordStyle};
use crate::tracker::{enrich, AccountLookup};

/// The record builder and formatter used for every row of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordMode {
    pub layout: RecordLayout,
    pub style: RecordStyle,
}

impl RecordMode {
    pub fn new(layout: RecordLayout, style: RecordStyle) -> Self {
        Self { layout, style }
    }

    pub fn width(&self) -> usize {
        self.layout.width()
    }

    pub fn render(&self, employee: &Employee) -> Vec<String> {
        format_record(self.style, &self.layout.build(employee))
    }
}

pub struct Pipeline<D, T> {
    mapper: EmployeeMapper<D>,
    tracker: Option<T>,
    mode: RecordMode,
}

impl<D: DirectorySearch, T: AccountLookup> Pipeline<D, T> {
    /// With `tracker` set, employees are enriched before projection; the
    /// layout in `mode` decides whether the profile column is emitted.
    pub fn new(mapper: EmployeeMapper<D>, tracker: Option<T>, mode: RecordMode) -> Self {
        Self {
            mapper,
            tracker,
            mode,
        }
    }

    pub fn mode(&self) -> RecordMode {
        self.mode
    }

    /// Resolve `key` and render one row per matching employee. No match,
    /// or a blank key, yields a single all-empty row.
    #[instrument(skip(self))]
    pub async fn process(&mut self, key: &str) -> Result<Vec<Vec<String>>, CoreError> {
        let key = key.trim();
        let mut employees = if key.is_empty() {
            debug!("blank key, emitting placeholder row");
            Vec::new()
        } else {
            self.mapper.search_employees(key).await?
        };

        if employees.is_empty() {
            if !key.is_empty() {
                warn!(key, "couldn't find employee");
            }
            employees.push(Employee::default());
        }

        let mut rows = Vec::with_capacity(employees.len());
        for employee in employees {
            let employee = match &self.tracker {
                Some(tracker) => enrich(employee, tracker).await?,
                None => employee,
            };
            rows.push(self.mode.render(&employee));
        }
        Ok(rows)
    }

    pub fn mapper(&self) -> &EmployeeMapper<D> {
        &self.mapper
    }

    pub fn into_mapper(self) -> EmployeeMapper<D> {
        self.mapper
    }
}

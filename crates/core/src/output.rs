//! Delimited row output.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::errors::OutputError;

/// Row encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values.
    #[default]
    Csv,
    /// Tab-separated values.
    Tsv,
}

impl OutputFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            OutputFormat::Csv => b',',
            OutputFormat::Tsv => b'\t',
        }
    }
}

/// Writes rendered rows with CSV quoting rules.
pub struct RowWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> RowWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        let inner = csv::WriterBuilder::new()
            .delimiter(format.delimiter())
            .flexible(true)
            .from_writer(writer);
        Self { inner }
    }

    pub fn write_row<S: AsRef<[u8]>>(&mut self, row: &[S]) -> Result<(), OutputError> {
        self.inner.write_record(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, OutputError> {
        self.inner
            .into_inner()
            .map_err(|e| OutputError::IoError(e.into_error()))
    }
}

use std::path::Path;

use crate::types::Record;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Invalid value '{value}' in column {column}")]
    InvalidValue { column: String, value: String },
}

/// A delimited file held as text: one header row and any number of data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_records<R: Record>(records: &[R]) -> Self {
        Self {
            headers: R::headers(),
            rows: records.iter().map(R::fields).collect(),
        }
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { headers, rows })
    }

    /// Truncates and rewrites `path`; an interrupted write leaves a partial file behind.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn column(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn rename(&mut self, from: &str, to: &str) {
        for header in self.headers.iter_mut().filter(|h| h.as_str() == from) {
            *header = to.to_string();
        }
    }
}

pub fn write_records<R: Record>(path: impl AsRef<Path>, records: &[R]) -> Result<(), TableError> {
    let path = path.as_ref();
    Table::from_records(records).write(path)?;
    log::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

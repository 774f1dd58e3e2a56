use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::record::{PropertyRecord, CSV_COLUMNS};

/// Single results slot; every fetch overwrites it.
pub const RESULTS_FILENAME: &str = "properties.csv";
pub const METADATA_FILENAME: &str = "search_metadata.txt";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access results file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid results CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("results writer task failed: {0}")]
    Task(String),
}

/// Handle describing what a save wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSearch {
    pub filename: String,
    pub count: usize,
    pub saved_at: DateTime<Utc>,
}

/// Flat-file storage rooted in the shared data directory.
#[derive(Debug, Clone)]
pub struct PropertyStore {
    data_dir: PathBuf,
}

impl PropertyStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Overwrites the results file and its metadata sidecar.
    pub fn save(
        &self,
        records: &[PropertyRecord],
        city: &str,
        state: &str,
        saved_at: DateTime<Utc>,
    ) -> Result<StoredSearch, StoreError> {
        fs::create_dir_all(&self.data_dir)?;

        let file = File::create(self.data_dir.join(RESULTS_FILENAME))?;
        write_records(file, records)?;

        let mut metadata = File::create(self.data_dir.join(METADATA_FILENAME))?;
        writeln!(metadata, "City: {city}")?;
        writeln!(metadata, "State: {state}")?;
        writeln!(metadata, "Properties: {}", records.len())?;
        writeln!(metadata, "Updated: {}", saved_at.to_rfc3339())?;

        Ok(StoredSearch {
            filename: RESULTS_FILENAME.to_string(),
            count: records.len(),
            saved_at,
        })
    }

    /// Maps a bare filename onto an existing file inside the data directory.
    /// Names that could escape the directory resolve to nothing.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let escapes = filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename == "."
            || filename.contains("..");
        if escapes {
            return None;
        }

        let path = self.data_dir.join(filename);
        path.is_file().then_some(path)
    }
}

/// Writes the header row followed by one row per record, even when empty.
pub fn write_records<W: Write>(writer: W, records: &[PropertyRecord]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(CSV_COLUMNS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<PropertyRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.deserialize::<PropertyRecord>().collect()
}

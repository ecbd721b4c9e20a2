// Records snapshot loading
use crate::error::{Error, Result};
use crate::models::{ManagedRecord, ManagedRecordResponse};
use chrono::TimeZone;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Where a snapshot of `/users` records is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    Stdin,
    File(PathBuf),
}

impl RecordSource {
    /// `-` reads from stdin, anything else is a file path
    pub fn parse(value: &str) -> Self {
        if value == "-" {
            RecordSource::Stdin
        } else {
            RecordSource::File(PathBuf::from(value))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RecordSource::Stdin => "<stdin>".to_string(),
            RecordSource::File(path) => path.display().to_string(),
        }
    }

    fn read_to_string(&self) -> Result<String> {
        match self {
            RecordSource::Stdin => {
                let mut contents = String::new();
                io::stdin().read_to_string(&mut contents)?;
                Ok(contents)
            }
            RecordSource::File(path) => read_file(path),
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::Snapshot(format!(
            "Records file not found: {}",
            path.display()
        )));
    }

    fs::read_to_string(path)
        .map_err(|e| Error::Snapshot(format!("Failed to read {}: {}", path.display(), e)))
}

/// Parse a JSON array of backend records and normalize them in `zone`'s calendar
pub fn parse_records<Tz: TimeZone>(contents: &str, zone: &Tz) -> Result<Vec<ManagedRecord>> {
    let responses: Vec<ManagedRecordResponse> = serde_json::from_str(contents)
        .map_err(|e| Error::Snapshot(format!("Failed to parse records: {}", e)))?;

    Ok(responses
        .into_iter()
        .map(|response| ManagedRecord::normalize(response, zone))
        .collect())
}

/// Load and normalize every record from `source`
pub fn load_records<Tz: TimeZone>(source: &RecordSource, zone: &Tz) -> Result<Vec<ManagedRecord>> {
    tracing::debug!("Loading records from {}", source.describe());
    let contents = source.read_to_string()?;
    let records = parse_records(&contents, zone)?;
    tracing::info!("Loaded {} records from {}", records.len(), source.describe());
    Ok(records)
}

//! Flat-file snapshots of each pipeline stage, for inspection after a run.
//!
//! raw_jobs.csv → formatted_jobs.csv → relevant_jobs.csv + job_results.json

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::models::{JobListing, RawJobRecord};

pub const RAW_JOBS_FILE: &str = "raw_jobs.csv";
pub const FORMATTED_JOBS_FILE: &str = "formatted_jobs.csv";
pub const RELEVANT_JOBS_FILE: &str = "relevant_jobs.csv";
pub const RESULTS_FILE: &str = "job_results.json";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ResultsDocument<'a> {
    generated_at: DateTime<Utc>,
    relevant_jobs: &'a [JobListing],
}

#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn create(&self, name: &str) -> Result<File, SnapshotError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| SnapshotError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(name);
        File::create(&path).map_err(|source| SnapshotError::Io { path, source })
    }

    /// Writes raw records with the union of their keys as columns.
    pub fn write_raw(&self, records: &[RawJobRecord]) -> Result<(), SnapshotError> {
        let mut columns: Vec<&String> = Vec::new();
        for key in records.iter().flat_map(|r| r.keys()) {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::NonNumeric)
            .from_writer(self.create(RAW_JOBS_FILE)?);
        writer.write_record(&columns)?;
        for record in records {
            writer.write_record(columns.iter().map(|key| cell(record.get(key))))?;
        }
        writer.flush().map_err(|source| SnapshotError::Io {
            path: self.dir.join(RAW_JOBS_FILE),
            source,
        })?;

        info!("Saved {} raw jobs to {RAW_JOBS_FILE}", records.len());
        Ok(())
    }

    pub fn write_formatted(&self, listings: &[JobListing]) -> Result<(), SnapshotError> {
        self.write_listings(FORMATTED_JOBS_FILE, listings)
    }

    /// Writes the relevant listings; nothing is written for an empty result.
    pub fn write_relevant(&self, listings: &[JobListing]) -> Result<(), SnapshotError> {
        if listings.is_empty() {
            return Ok(());
        }
        self.write_listings(RELEVANT_JOBS_FILE, listings)
    }

    pub fn write_results(&self, relevant_jobs: &[JobListing]) -> Result<(), SnapshotError> {
        let document = ResultsDocument {
            generated_at: Utc::now(),
            relevant_jobs,
        };
        serde_json::to_writer_pretty(self.create(RESULTS_FILE)?, &document)?;
        info!("Saved results to {RESULTS_FILE}");
        Ok(())
    }

    fn write_listings(&self, name: &str, listings: &[JobListing]) -> Result<(), SnapshotError> {
        let mut writer = WriterBuilder::new().from_writer(self.create(name)?);
        for listing in listings {
            writer.serialize(listing)?;
        }
        writer.flush().map_err(|source| SnapshotError::Io {
            path: self.dir.join(name),
            source,
        })?;
        info!("Saved {} jobs to {name}", listings.len());
        Ok(())
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobNature;
    use serde_json::json;

    fn listing(title: &str) -> JobListing {
        JobListing {
            job_title: title.to_string(),
            company: "Acme".to_string(),
            experience: "not found".to_string(),
            job_nature: JobNature::Remote,
            location: "Lahore".to_string(),
            salary: "50000 - 80000 PKR".to_string(),
            apply_link: "https://jobs.example/1".to_string(),
        }
    }

    #[test]
    fn test_raw_snapshot_uses_union_of_keys() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        let records: Vec<RawJobRecord> = vec![
            serde_json::from_value(json!({"title": "A", "min_amount": 100})).unwrap(),
            serde_json::from_value(json!({"title": "B", "is_remote": true})).unwrap(),
        ];

        writer.write_raw(&records).unwrap();

        let content = std::fs::read_to_string(dir.path().join(RAW_JOBS_FILE)).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        for column in ["title", "min_amount", "is_remote"] {
            assert!(header.contains(column), "missing column {column}");
        }
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_raw_snapshot_quotes_text_and_leaves_numbers_bare() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        let records: Vec<RawJobRecord> =
            vec![serde_json::from_value(json!({"title": "Dev", "min_amount": 100})).unwrap()];

        writer.write_raw(&records).unwrap();

        let content = std::fs::read_to_string(dir.path().join(RAW_JOBS_FILE)).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec![r#""title","min_amount""#, r#""Dev",100"#]);
    }

    #[test]
    fn test_listing_snapshot_has_public_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        writer.write_formatted(&[listing("Rust Dev")]).unwrap();

        let content = std::fs::read_to_string(dir.path().join(FORMATTED_JOBS_FILE)).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "job_title,company,experience,jobNature,location,salary,apply_link"
        );
        assert!(lines.next().unwrap().starts_with("Rust Dev,Acme,not found,Remote,"));
    }

    #[test]
    fn test_empty_relevant_snapshot_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        writer.write_relevant(&[]).unwrap();
        assert!(!dir.path().join(RELEVANT_JOBS_FILE).exists());
    }

    #[test]
    fn test_results_document_has_iso_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        writer.write_results(&[listing("Rust Dev")]).unwrap();

        let content = std::fs::read_to_string(dir.path().join(RESULTS_FILE)).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        let stamp = value["generated_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
        assert_eq!(value["relevant_jobs"][0]["jobNature"], "Remote");
    }
}

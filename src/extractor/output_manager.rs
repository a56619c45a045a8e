use crate::config::OutputConfig;
use crate::error::{PdfTabError, Result};
use crate::extractor::ExtractedTable;
use crate::tracker::progress_tracker::secs_from_delta;
use crate::tracker::FileRecord;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE_NAME: &str = "pdftab_summary.json";

/// Persists the tables accumulated for one source file.
pub trait ResultSink {
    /// Called once per file, after its last part. Returns the artifact path.
    fn persist(&self, source: &Path, tables: &[ExtractedTable]) -> Result<PathBuf>;
}

#[derive(Serialize)]
struct TableArtifact<'a> {
    source: &'a str,
    extracted_at: DateTime<Local>,
    table_count: usize,
    row_count: usize,
    tables: &'a [ExtractedTable],
}

/// Writes one JSON document per source file into the output directory.
pub struct JsonTableSink {
    output_directory: PathBuf,
    pretty: bool,
    overwrite: bool,
}

impl JsonTableSink {
    pub fn new<P: Into<PathBuf>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.into(),
            pretty: true,
            overwrite: true,
        }
    }

    pub fn from_config(config: &OutputConfig, output_directory: &Path) -> Self {
        Self::new(output_directory)
            .with_pretty(config.pretty)
            .with_overwrite(config.overwrite)
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn artifact_path(&self, source: &Path) -> Result<PathBuf> {
        Ok(self.output_directory.join(artifact_name(source)?))
    }
}

impl ResultSink for JsonTableSink {
    fn persist(&self, source: &Path, tables: &[ExtractedTable]) -> Result<PathBuf> {
        let target = self.artifact_path(source)?;
        if target.exists() && !self.overwrite {
            return Err(PdfTabError::OutputExists {
                path: target.display().to_string(),
            });
        }

        let source_name = source.to_string_lossy();
        let artifact = TableArtifact {
            source: &source_name,
            extracted_at: Local::now(),
            table_count: tables.len(),
            row_count: tables.iter().map(ExtractedTable::row_count).sum(),
            tables,
        };

        write_json_atomically(&self.output_directory, &target, &artifact, self.pretty)?;
        Ok(target)
    }
}

/// Source file name without its extension, remaining dots replaced, plus `.json`.
pub fn artifact_name(source: &Path) -> Result<String> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PdfTabError::InvalidPath {
            path: format!("Cannot derive output name from {}", source.display()),
        })?;

    let stem = match file_name.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => file_name,
    };

    Ok(format!("{}.json", stem.replace('.', "_")))
}

fn write_json_atomically<T: Serialize>(
    directory: &Path,
    target: &Path,
    value: &T,
    pretty: bool,
) -> Result<()> {
    fs::create_dir_all(directory)?;

    let temp_file = tempfile::NamedTempFile::new_in(directory)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        if pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writer.flush()?;
    }
    temp_file.persist(target).map_err(|e| PdfTabError::Io(e.error))?;

    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub position: usize,
    pub name: String,
    pub pages: u32,
    pub parts: u32,
    pub tables: usize,
    pub rows: usize,
    pub started_at: Option<DateTime<Local>>,
    pub finished_at: Option<DateTime<Local>>,
    pub elapsed_secs: Option<f64>,
    pub pages_per_sec: Option<f64>,
    pub artifact: Option<PathBuf>,
}

impl FileSummary {
    pub fn from_record(
        record: &FileRecord,
        parts: u32,
        tables: &[ExtractedTable],
        artifact: Option<PathBuf>,
    ) -> Self {
        Self {
            position: record.position,
            name: record.name.clone(),
            pages: record.page_count,
            parts,
            tables: tables.len(),
            rows: tables.iter().map(ExtractedTable::row_count).sum(),
            started_at: record.start_time,
            finished_at: record.finish_estimate.filter(|_| record.is_finished()),
            elapsed_secs: record.elapsed.map(secs_from_delta),
            pages_per_sec: record.speed,
            artifact,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub directory: PathBuf,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub files: Vec<FileSummary>,
}

impl RunReport {
    pub fn total_pages(&self) -> u64 {
        self.files.iter().map(|f| u64::from(f.pages)).sum()
    }

    pub fn total_tables(&self) -> usize {
        self.files.iter().map(|f| f.tables).sum()
    }

    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }

    pub fn elapsed_secs(&self) -> f64 {
        secs_from_delta(self.finished_at - self.started_at)
    }

    pub fn save_summary(&self, directory: &Path) -> Result<PathBuf> {
        let target = directory.join(SUMMARY_FILE_NAME);
        write_json_atomically(directory, &target, self, true)?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::PdfFile;
    use crate::tracker::ProgressTracker;
    use tempfile::TempDir;

    fn sample_tables() -> Vec<ExtractedTable> {
        vec![ExtractedTable {
            page: 2,
            rows: vec![
                vec!["Region".to_string(), "Q1".to_string()],
                vec!["North".to_string(), "10".to_string()],
            ],
        }]
    }

    #[test]
    fn test_artifact_name() {
        assert_eq!(artifact_name(Path::new("report.pdf")).unwrap(), "report.json");
        assert_eq!(
            artifact_name(Path::new("/data/annual.2023.v2.pdf")).unwrap(),
            "annual_2023_v2.json"
        );
        assert_eq!(artifact_name(Path::new("noext")).unwrap(), "noext.json");
    }

    #[test]
    fn test_persist_writes_json() {
        let temp_dir = TempDir::new().unwrap();
        let sink = JsonTableSink::new(temp_dir.path().join("out"));

        let path = sink
            .persist(Path::new("in/annual.2023.pdf"), &sample_tables())
            .unwrap();
        assert_eq!(path, temp_dir.path().join("out").join("annual_2023.json"));

        let content: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content["table_count"], 1);
        assert_eq!(content["row_count"], 2);
        assert_eq!(content["tables"][0]["page"], 2);
        assert_eq!(content["tables"][0]["rows"][1][0], "North");
    }

    #[test]
    fn test_persist_respects_overwrite_flag() {
        let temp_dir = TempDir::new().unwrap();
        let sink = JsonTableSink::new(temp_dir.path()).with_overwrite(false);

        sink.persist(Path::new("a.pdf"), &[]).unwrap();
        let second = sink.persist(Path::new("a.pdf"), &[]);
        assert!(matches!(second, Err(PdfTabError::OutputExists { .. })));

        let sink = sink.with_overwrite(true).with_pretty(false);
        assert!(sink.persist(Path::new("a.pdf"), &sample_tables()).is_ok());
    }

    #[test]
    fn test_run_report_summary() {
        let temp_dir = TempDir::new().unwrap();
        let mut tracker = ProgressTracker::new(vec![PdfFile {
            path: PathBuf::from("a.pdf"),
            name: "a.pdf".to_string(),
            size: 10,
            page_count: 4,
        }])
        .unwrap();
        tracker.start("a.pdf").unwrap();
        tracker.record_progress("a.pdf", 4, 4, 0.5).unwrap();
        tracker.finish("a.pdf").unwrap();

        let summary = FileSummary::from_record(
            tracker.record(0).unwrap(),
            1,
            &sample_tables(),
            Some(PathBuf::from("a.json")),
        );
        assert_eq!(summary.rows, 2);
        assert!(summary.finished_at.is_some());

        let now = Local::now();
        let report = RunReport {
            directory: temp_dir.path().to_path_buf(),
            started_at: now,
            finished_at: now,
            files: vec![summary],
        };
        assert_eq!(report.total_pages(), 4);
        assert_eq!(report.total_tables(), 1);
        assert_eq!(report.total_rows(), 2);

        let path = report.save_summary(temp_dir.path()).unwrap();
        let loaded: RunReport =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(loaded.files[0].name, "a.pdf");
    }
}

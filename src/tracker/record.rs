use crate::scanner::PdfFile;
use chrono::{DateTime, Local, TimeDelta};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPhase {
    Pending,
    InProgress,
    Finished,
}

impl fmt::Display for RecordPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordPhase::Pending => "pending",
            RecordPhase::InProgress => "in progress",
            RecordPhase::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Metadata and live progress of one tracked file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub position: usize,
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub page_count: u32,
    pub start_time: Option<DateTime<Local>>,
    /// Estimated finish while pending or in progress, actual finish once finished.
    pub finish_estimate: Option<DateTime<Local>>,
    pub elapsed: Option<TimeDelta>,
    /// Pages per second.
    pub speed: Option<f64>,
    /// Percent done, 0 to 100.
    pub status: Option<f64>,
    pub phase: RecordPhase,
}

impl FileRecord {
    pub(crate) fn from_discovery(position: usize, file: PdfFile) -> Self {
        Self {
            position,
            name: file.name,
            path: file.path,
            size_bytes: file.size,
            page_count: file.page_count,
            start_time: None,
            finish_estimate: None,
            elapsed: None,
            speed: None,
            status: None,
            phase: RecordPhase::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.phase == RecordPhase::Pending
    }

    pub fn is_finished(&self) -> bool {
        self.phase == RecordPhase::Finished
    }
}

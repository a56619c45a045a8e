use crate::error::{PdfTabError, Result};
use crate::scanner::PdfFile;
use crate::tracker::record::{FileRecord, RecordPhase};
use chrono::{DateTime, Local, TimeDelta};
use std::collections::HashMap;

/// Upper bound for any single estimate, keeps absurd speeds from overflowing timestamps.
const MAX_ESTIMATE_SECS: f64 = 10.0 * 365.0 * 24.0 * 3600.0;

/// Converts fractional seconds to a [TimeDelta], clamped to `[0, MAX_ESTIMATE_SECS]`.
pub(crate) fn delta_from_secs(secs: f64) -> TimeDelta {
    let clamped = if secs.is_nan() {
        0.0
    } else {
        secs.clamp(0.0, MAX_ESTIMATE_SECS)
    };
    TimeDelta::microseconds((clamped * 1_000_000.0).round() as i64)
}

pub(crate) fn secs_from_delta(delta: TimeDelta) -> f64 {
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}

type Renderer = Box<dyn Fn(&[FileRecord])>;

/// Owns one [FileRecord] per discovered file and keeps their derived fields current.
///
/// Every mutation ends with a call to the renderer, if one is attached. An ETA
/// update touches every later record, so a tracker shared between threads
/// belongs behind a single `Mutex`.
pub struct ProgressTracker {
    records: Vec<FileRecord>,
    positions: HashMap<String, usize>,
    renderer: Option<Renderer>,
}

impl ProgressTracker {
    pub fn new(files: Vec<PdfFile>) -> Result<Self> {
        let mut records = Vec::with_capacity(files.len());
        let mut positions = HashMap::with_capacity(files.len());

        for (position, file) in files.into_iter().enumerate() {
            if positions.insert(file.name.clone(), position).is_some() {
                return Err(PdfTabError::DuplicateFileName { name: file.name });
            }
            records.push(FileRecord::from_discovery(position, file));
        }

        Ok(Self {
            records,
            positions,
            renderer: None,
        })
    }

    pub fn with_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&[FileRecord]) + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn start(&mut self, name: &str) -> Result<()> {
        self.start_at(name, Local::now())
    }

    pub fn start_at(&mut self, name: &str, now: DateTime<Local>) -> Result<()> {
        let record = self.record_in_phase(name, RecordPhase::Pending, "start")?;

        record.start_time = Some(now);
        record.status = Some(0.0);
        record.phase = RecordPhase::InProgress;

        self.render();
        Ok(())
    }

    /// Records a finished part: `pages_loaded` is cumulative, the other two describe the part.
    ///
    /// `part_elapsed_secs` must be positive.
    pub fn record_progress(
        &mut self,
        name: &str,
        pages_loaded: u32,
        part_pages: u32,
        part_elapsed_secs: f64,
    ) -> Result<()> {
        self.record_progress_at(name, pages_loaded, part_pages, part_elapsed_secs, Local::now())
    }

    pub fn record_progress_at(
        &mut self,
        name: &str,
        pages_loaded: u32,
        part_pages: u32,
        part_elapsed_secs: f64,
        now: DateTime<Local>,
    ) -> Result<()> {
        debug_assert!(part_elapsed_secs > 0.0, "part elapsed time must be positive");

        let record = self.record_in_phase(name, RecordPhase::InProgress, "record progress for")?;
        let position = record.position;
        let started = record.start_time.unwrap_or(now);

        let speed = f64::from(part_pages) / part_elapsed_secs;
        let remaining_pages = f64::from(record.page_count.saturating_sub(pages_loaded));

        record.elapsed = Some(now - started);
        record.speed = Some(speed);
        record.finish_estimate = Some(now + delta_from_secs(remaining_pages / speed));
        record.status = Some(
            (f64::from(pages_loaded) / f64::from(record.page_count) * 100.0).clamp(0.0, 100.0),
        );

        self.propagate_estimates(position, speed);
        self.render();
        Ok(())
    }

    pub fn finish(&mut self, name: &str) -> Result<()> {
        self.finish_at(name, Local::now())
    }

    pub fn finish_at(&mut self, name: &str, now: DateTime<Local>) -> Result<()> {
        let record = self.record_in_phase(name, RecordPhase::InProgress, "finish")?;
        let elapsed = now - record.start_time.unwrap_or(now);

        record.finish_estimate = Some(now);
        record.elapsed = Some(elapsed);
        record.speed = Some(f64::from(record.page_count) / secs_from_delta(elapsed));
        record.status = Some(100.0);
        record.phase = RecordPhase::Finished;

        self.render();
        Ok(())
    }

    pub fn file_count(&self) -> usize {
        self.records.len()
    }

    pub fn page_count(&self, position: usize) -> Option<u32> {
        self.records.get(position).map(|r| r.page_count)
    }

    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.records.get(position).map(|r| r.name.as_str())
    }

    pub fn record(&self, position: usize) -> Option<&FileRecord> {
        self.records.get(position)
    }

    pub fn record_by_name(&self, name: &str) -> Result<&FileRecord> {
        let position = self.position_of(name)?;
        Ok(&self.records[position])
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn total_pages(&self) -> u64 {
        self.records.iter().map(|r| u64::from(r.page_count)).sum()
    }

    /// Redraws without mutating anything, e.g. for the initial all-pending table.
    pub fn render(&self) {
        if let Some(ref renderer) = self.renderer {
            renderer(&self.records);
        }
    }

    fn position_of(&self, name: &str) -> Result<usize> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| PdfTabError::FileNotFound {
                name: name.to_string(),
            })
    }

    fn record_in_phase(
        &mut self,
        name: &str,
        expected: RecordPhase,
        operation: &'static str,
    ) -> Result<&mut FileRecord> {
        let position = self.position_of(name)?;
        let record = &mut self.records[position];

        if record.phase != expected {
            return Err(PdfTabError::InvalidTransition {
                name: name.to_string(),
                operation,
                phase: record.phase,
            });
        }

        Ok(record)
    }

    /// Chains estimates through the queue behind `position`, assuming every
    /// remaining file runs at `speed`.
    fn propagate_estimates(&mut self, position: usize, speed: f64) {
        let mut previous = self.records[position].finish_estimate;

        for record in self.records.iter_mut().skip(position + 1) {
            let Some(previous_finish) = previous else {
                break;
            };

            if record.is_pending() {
                let duration = delta_from_secs(f64::from(record.page_count) / speed);
                record.finish_estimate = Some(previous_finish + duration);
            }
            previous = record.finish_estimate;
        }
    }
}

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod partition;
pub mod scanner;
pub mod tracker;
pub mod ui;

#[cfg(test)]
mod test_support;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, DisplayConfig, ExtractionConfig, OutputConfig, ScanConfig};
pub use error::{PdfTabError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    ExtractedTable, FileSummary, JsonTableSink, ResultSink, RunReport, TableExtractor,
    TextTableExtractor,
};
pub use partition::{PageRange, PageRanges, DEFAULT_PAGES_PER_PART};
pub use scanner::{LopdfInspector, PageCounter, PdfFile, PdfScanner, ScanProgress};
pub use tracker::{FileRecord, ProgressTracker, RecordPhase};
pub use ui::{OutputFormatter, OutputMode, ProgressManager, StatusTable, TableReporter};

use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Floor for a part's measured time; speed divides by it.
const MIN_PART_SECS: f64 = 1e-6;

/// What a dry run reports for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FilePlan {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub page_count: u32,
    pub ranges: Vec<PageRange>,
}

/// Main library interface: discover, convert part by part, persist, report.
pub struct PdfTab {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl PdfTab {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(output_formatter.wants_progress_bars());

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet))
    }

    /// Converts every PDF in the configured directory with the lopdf-backed collaborators.
    pub fn run(&self) -> Result<RunReport> {
        let extractor = TextTableExtractor::new(self.config.extraction.min_column_gap).map_err(
            |e| PdfTabError::Config {
                message: format!("{:#}", e),
            },
        )?;
        let sink = JsonTableSink::from_config(&self.config.output, self.config.output_directory());

        self.run_with(&LopdfInspector, &extractor, &sink)
    }

    pub fn run_with(
        &self,
        counter: &dyn PageCounter,
        extractor: &dyn TableExtractor,
        sink: &dyn ResultSink,
    ) -> Result<RunReport> {
        let started_at = Local::now();
        let directory = self.config.scan.directory.clone();

        let files = self.discover(&directory, counter)?;
        self.output_formatter
            .info(&format!("Found {} PDF files", files.len()));

        let reporter = TableReporter::new(
            &self.config.display,
            self.output_formatter.wants_status_table(),
        );
        let mut tracker =
            ProgressTracker::new(files)?.with_renderer(move |records| reporter.render(records));
        tracker.render();

        let work: Vec<(String, PathBuf, u32)> = tracker
            .records()
            .iter()
            .map(|r| (r.name.clone(), r.path.clone(), r.page_count))
            .collect();

        let mut summaries = Vec::with_capacity(work.len());
        for (name, path, page_count) in work {
            summaries.push(self.convert_file(
                &mut tracker,
                &name,
                &path,
                page_count,
                extractor,
                sink,
            )?);
        }

        let report = RunReport {
            directory,
            started_at,
            finished_at: Local::now(),
            files: summaries,
        };

        if self.config.output.write_summary {
            let summary_path = report.save_summary(self.config.output_directory())?;
            log::info!("Wrote run summary to {}", summary_path.display());
        }

        Ok(report)
    }

    fn convert_file(
        &self,
        tracker: &mut ProgressTracker,
        name: &str,
        path: &Path,
        page_count: u32,
        extractor: &dyn TableExtractor,
        sink: &dyn ResultSink,
    ) -> Result<FileSummary> {
        tracker.start(name)?;
        log::info!("Converting {} ({} pages)", name, page_count);

        let ranges = PageRanges::new(page_count, self.config.extraction.pages_per_part);
        let parts = ranges.part_count();
        let mut tables = Vec::new();

        for range in ranges {
            let part_started = Instant::now();
            let part_tables =
                extractor
                    .extract(path, range)
                    .map_err(|e| PdfTabError::Extraction {
                        path: path.display().to_string(),
                        range,
                        message: format!("{:#}", e),
                    })?;
            let part_secs = part_started.elapsed().as_secs_f64().max(MIN_PART_SECS);

            log::debug!(
                "{} pages {}: {} tables in {:.3}s",
                name,
                range,
                part_tables.len(),
                part_secs
            );
            tables.extend(part_tables);
            tracker.record_progress(name, range.last, range.len(), part_secs)?;
        }

        let artifact = sink.persist(path, &tables)?;
        log::info!("Saved {} tables from {} to {}", tables.len(), name, artifact.display());
        tracker.finish(name)?;

        let record = tracker.record_by_name(name)?;
        Ok(FileSummary::from_record(record, parts, &tables, Some(artifact)))
    }

    /// Discovery only: files in processing order with their planned page ranges.
    pub fn plan(&self) -> Result<Vec<FilePlan>> {
        self.plan_with(&LopdfInspector)
    }

    pub fn plan_with(&self, counter: &dyn PageCounter) -> Result<Vec<FilePlan>> {
        let files = self.discover(&self.config.scan.directory, counter)?;
        let pages_per_part = self.config.extraction.pages_per_part;

        Ok(files
            .into_iter()
            .map(|file| FilePlan {
                ranges: PageRanges::new(file.page_count, pages_per_part).collect(),
                name: file.name,
                path: file.path,
                size_bytes: file.size,
                page_count: file.page_count,
            })
            .collect())
    }

    fn discover(&self, directory: &Path, counter: &dyn PageCounter) -> Result<Vec<PdfFile>> {
        self.output_formatter
            .start_operation(&format!("Scanning {}", directory.display()));

        let scanner = PdfScanner::new(&self.config.scan);
        let scan_started = Instant::now();
        let scan_progress = self.progress_manager.create_scan_progress(0);
        let progress_callback = {
            let pb = scan_progress.clone();
            move |progress: &ScanProgress| {
                ui::progress::update_scan_progress(&pb, progress);
            }
        };

        let files = match scanner.scan_directory(directory, counter, Some(&progress_callback)) {
            Ok(files) => files,
            Err(e) => {
                scan_progress.abandon();
                self.progress_manager.clear();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &scan_progress,
            &format!("Inspected {} PDF files", files.len()),
            scan_started.elapsed(),
        );
        self.progress_manager.clear();

        Ok(files)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &PdfTabError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        target: std::env::consts::ARCH.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_date: &'static str,
    pub target: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pdftab {} ({}) built on {} for {}",
            self.version, self.git_hash, self.build_date, self.target
        )
    }
}

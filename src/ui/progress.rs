use crate::scanner::ScanProgress;
use crate::ui::format_duration;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Owns the progress bars shown before the status table takes over the screen.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    /// Bar for the discovery pass that opens every PDF to count its pages.
    pub fn create_scan_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_files));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>5}/{len:5} files {percent:>3}% {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Inspecting PDF files...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn clear(&self) {
        if self.enabled {
            self.multi_progress.clear().ok();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_scan_progress(pb: &ProgressBar, progress: &ScanProgress) {
    pb.set_length(progress.total_files as u64);
    pb.set_position(progress.files_inspected as u64);

    match progress.current_file {
        Some(ref current_file) => pb.set_message(format!("Inspecting {}", current_file)),
        None => pb.set_message("Calculating files size..."),
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_manager_creation() {
        let manager = ProgressManager::new(true);
        assert!(manager.is_enabled());

        let disabled_manager = ProgressManager::new(false);
        assert!(!disabled_manager.is_enabled());
    }

    #[test]
    fn test_disabled_progress_bars() {
        let manager = ProgressManager::new(false);

        let scan_pb = manager.create_scan_progress(10);
        assert!(scan_pb.is_hidden());
    }

    #[test]
    fn test_update_scan_progress() {
        let manager = ProgressManager::new(false);
        let pb = manager.create_scan_progress(0);

        update_scan_progress(
            &pb,
            &ScanProgress {
                files_inspected: 2,
                total_files: 4,
                current_file: Some("b.pdf".to_string()),
            },
        );
        assert_eq!(pb.position(), 2);
        assert_eq!(pb.length(), Some(4));
        assert_eq!(pb.message(), "Inspecting b.pdf");

        finish_progress_with_summary(&pb, "Inspected 4 files", Duration::from_millis(250));
        assert!(pb.is_finished());
    }
}

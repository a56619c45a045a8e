use crate::config::ScanConfig;
use regex::Regex;
use std::path::Path;

const PDF_EXTENSION: &str = "pdf";

pub struct FileFilter {
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &ScanConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self { exclude_patterns }
    }

    pub fn is_pdf_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            return true;
        };

        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(file_name))
    }

    pub fn accepts(&self, path: &Path) -> bool {
        self.is_pdf_file(path) && !self.is_excluded(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_with(patterns: &[&str]) -> FileFilter {
        FileFilter::new(&ScanConfig {
            exclude_patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ..ScanConfig::default()
        })
    }

    #[test]
    fn test_pdf_detection() {
        let filter = filter_with(&[]);
        assert!(filter.is_pdf_file(Path::new("report.pdf")));
        assert!(filter.is_pdf_file(Path::new("REPORT.PDF")));
        assert!(filter.is_pdf_file(Path::new("annual.2023.pdf")));
        assert!(!filter.is_pdf_file(Path::new("report.pdf.bak")));
        assert!(!filter.is_pdf_file(Path::new("pdf")));
        assert!(!filter.is_pdf_file(Path::new("notes.txt")));
    }

    #[test]
    fn test_exclude_patterns() {
        let filter = filter_with(&[r"^draft_", r"\.signed\.pdf$"]);
        assert!(!filter.accepts(Path::new("draft_q1.pdf")));
        assert!(!filter.accepts(Path::new("contract.signed.pdf")));
        assert!(filter.accepts(Path::new("contract.pdf")));
    }

    #[test]
    fn test_invalid_patterns_are_ignored() {
        let filter = filter_with(&["(unclosed"]);
        assert!(filter.accepts(Path::new("a.pdf")));
    }
}

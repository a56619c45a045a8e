use crate::config::ScanConfig;
use crate::error::{PdfTabError, Result};
use crate::scanner::file_filter::FileFilter;
use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Answers how many pages a PDF file has.
pub trait PageCounter {
    fn page_count(&self, path: &Path) -> anyhow::Result<u32>;
}

/// [PageCounter] backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfInspector;

impl PageCounter for LopdfInspector {
    fn page_count(&self, path: &Path) -> anyhow::Result<u32> {
        let document = lopdf::Document::load(path)
            .with_context(|| format!("loading {}", path.display()))?;
        let pages = document.get_pages().len();
        u32::try_from(pages).context("page count does not fit in 32 bits")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub page_count: u32,
}

#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub files_inspected: usize,
    pub total_files: usize,
    pub current_file: Option<String>,
}

impl ScanProgress {
    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_inspected as f64 / self.total_files as f64) * 100.0
        }
    }
}

pub struct PdfScanner {
    filter: FileFilter,
}

impl PdfScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
        }
    }

    /// Lists the PDF files directly inside `root`, in directory-listing order.
    pub fn list_pdf_files<P: AsRef<Path>>(&self, root: P) -> Result<Vec<PathBuf>> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(PdfTabError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut files = Vec::new();

        // No sorting: processing order is the order the directory reports.
        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping unreadable directory entry: {}", err);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.filter.accepts(entry.path()) {
                files.push(entry.into_path());
            }
        }

        if files.is_empty() {
            return Err(PdfTabError::NoPdfFiles {
                directory: root_path.display().to_string(),
            });
        }

        Ok(files)
    }

    /// Discovers PDF files and inspects each for its size and page count.
    pub fn scan_directory<P: AsRef<Path>>(
        &self,
        root: P,
        inspector: &dyn PageCounter,
        progress_callback: Option<&dyn Fn(&ScanProgress)>,
    ) -> Result<Vec<PdfFile>> {
        let paths = self.list_pdf_files(root)?;
        let mut progress = ScanProgress {
            files_inspected: 0,
            total_files: paths.len(),
            current_file: None,
        };
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            let name = file_name_of(&path)?;
            progress.current_file = Some(name.clone());
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let size = std::fs::metadata(&path)?.len();
            let page_count = inspector
                .page_count(&path)
                .map_err(|e| PdfTabError::PdfParse {
                    path: path.display().to_string(),
                    message: format!("{:#}", e),
                })?;

            if page_count == 0 {
                return Err(PdfTabError::PdfParse {
                    path: path.display().to_string(),
                    message: "document has no pages".to_string(),
                });
            }

            log::debug!("Discovered {} ({} bytes, {} pages)", name, size, page_count);
            files.push(PdfFile {
                path,
                name,
                size,
                page_count,
            });
            progress.files_inspected += 1;
        }

        progress.current_file = None;
        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(files)
    }
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| PdfTabError::InvalidPath {
            path: format!("File name is not valid UTF-8: {}", path.display()),
        })
}

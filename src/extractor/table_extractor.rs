use crate::partition::PageRange;
use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A block of consecutive multi-cell lines must span at least this many rows to count as a table.
const MIN_TABLE_ROWS: usize = 2;

/// Raw cell values found on one page, no header inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTable {
    pub page: u32,
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Pulls tables out of an inclusive page range of a PDF file.
///
/// Implementations may take time proportional to the range size; callers
/// time each call to measure throughput.
pub trait TableExtractor {
    fn extract(&self, path: &Path, range: PageRange) -> anyhow::Result<Vec<ExtractedTable>>;
}

/// Splits text lines into cells on runs of whitespace.
#[derive(Debug, Clone)]
pub struct RowSplitter {
    separator: Regex,
}

impl RowSplitter {
    pub fn new(min_column_gap: usize) -> anyhow::Result<Self> {
        let pattern = format!(r"[ \t]{{{},}}", min_column_gap.max(1));
        let separator = Regex::new(&pattern).context("building column separator pattern")?;
        Ok(Self { separator })
    }

    pub fn split_line(&self, line: &str) -> Vec<String> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }

        self.separator
            .split(line)
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Groups consecutive lines with two or more cells into tables.
    pub fn tables_from_text(&self, page: u32, text: &str) -> Vec<ExtractedTable> {
        let mut tables = Vec::new();
        let mut current: Vec<Vec<String>> = Vec::new();

        for line in text.lines() {
            let cells = self.split_line(line);
            if cells.len() >= 2 {
                current.push(cells);
                continue;
            }

            if current.len() >= MIN_TABLE_ROWS {
                tables.push(ExtractedTable {
                    page,
                    rows: std::mem::take(&mut current),
                });
            } else {
                current.clear();
            }
        }

        if current.len() >= MIN_TABLE_ROWS {
            tables.push(ExtractedTable {
                page,
                rows: current,
            });
        }

        tables
    }
}

/// [TableExtractor] that reads page text with `lopdf` and splits it with a [RowSplitter].
///
/// The document is reopened on every call, so memory use is bounded by one
/// part rather than the whole file.
#[derive(Debug, Clone)]
pub struct TextTableExtractor {
    splitter: RowSplitter,
}

impl TextTableExtractor {
    pub fn new(min_column_gap: usize) -> anyhow::Result<Self> {
        Ok(Self {
            splitter: RowSplitter::new(min_column_gap)?,
        })
    }
}

impl TableExtractor for TextTableExtractor {
    fn extract(&self, path: &Path, range: PageRange) -> anyhow::Result<Vec<ExtractedTable>> {
        let document = lopdf::Document::load(path)
            .with_context(|| format!("loading {}", path.display()))?;

        let mut tables = Vec::new();
        for page in range.pages() {
            let text = document
                .extract_text(&[page])
                .with_context(|| format!("reading text of page {}", page))?;
            tables.extend(self.splitter.tables_from_text(page, &text));
        }

        Ok(tables)
    }
}

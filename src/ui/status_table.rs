use crate::config::DisplayConfig;
use crate::tracker::FileRecord;
use crate::ui::format_bytes;
use chrono::{DateTime, Local, TimeDelta};
use console::{measure_text_width, pad_str, style, Alignment, Term};

const PLACEHOLDER: &str = "-";
const FILE_COLUMN: usize = 1;
const MIN_FILE_COLUMN_WIDTH: usize = 8;

const HEADERS: [&str; 9] = [
    "№",
    "File",
    "Size",
    "Pages",
    "Start",
    "Finish",
    "Dur",
    "Speed (p/s)",
    "Status",
];

const RIGHT_ALIGNED: [bool; 9] = [true, false, true, true, false, false, true, true, true];

/// Lays out tracker records as a boxed text table.
#[derive(Debug, Clone)]
pub struct StatusTable {
    title: String,
    width: usize,
    styled: bool,
}

impl StatusTable {
    pub fn new<S: Into<String>>(title: S, width: usize) -> Self {
        Self {
            title: title.into(),
            width,
            styled: false,
        }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.title.clone(), config.width)
    }

    pub fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn row_cells(record: &FileRecord) -> [String; 9] {
        [
            (record.position + 1).to_string(),
            record.name.clone(),
            format_bytes(record.size_bytes),
            record.page_count.to_string(),
            format_clock(record.start_time),
            format_clock(record.finish_estimate),
            format_elapsed(record.elapsed),
            format_speed(record.speed),
            format_status(record.status),
        ]
    }

    pub fn render(&self, records: &[FileRecord]) -> String {
        let rows: Vec<[String; 9]> = records.iter().map(Self::row_cells).collect();
        let widths = self.column_widths(&rows);

        let mut lines = Vec::with_capacity(rows.len() + 5);
        lines.push(self.styled_title());
        lines.push(border('┌', '┬', '┐', &widths));

        let header: Vec<String> = HEADERS
            .iter()
            .map(|h| {
                if self.styled {
                    style(*h).bold().cyan().to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();
        lines.push(table_row(&header, &widths));
        lines.push(border('├', '┼', '┤', &widths));

        for row in &rows {
            lines.push(table_row(row, &widths));
        }
        lines.push(border('└', '┴', '┘', &widths));

        lines
            .iter()
            .map(|line| {
                pad_str(line, self.width, Alignment::Center, None)
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn styled_title(&self) -> String {
        if self.styled {
            style(&self.title).bold().to_string()
        } else {
            self.title.clone()
        }
    }

    fn column_widths(&self, rows: &[[String; 9]]) -> [usize; 9] {
        let mut widths = HEADERS.map(measure_text_width);
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(measure_text_width(cell));
            }
        }

        // "│ " before every cell, " " after, and the closing "│"
        let total: usize = widths.iter().map(|w| w + 3).sum::<usize>() + 1;
        if total > self.width {
            let excess = total - self.width;
            widths[FILE_COLUMN] = widths[FILE_COLUMN]
                .saturating_sub(excess)
                .max(MIN_FILE_COLUMN_WIDTH);
        }

        widths
    }
}

fn border(left: char, middle: char, right: char, widths: &[usize; 9]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!(
        "{}{}{}",
        left,
        segments.join(&middle.to_string()),
        right
    )
}

fn table_row<S: AsRef<str>>(cells: &[S], widths: &[usize; 9]) -> String {
    let mut line = String::from("│");
    for (index, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
        let alignment = if RIGHT_ALIGNED[index] {
            Alignment::Right
        } else {
            Alignment::Left
        };
        let text = cell.as_ref();
        let truncate = if measure_text_width(text) > *width {
            Some("…")
        } else {
            None
        };
        line.push(' ');
        line.push_str(&pad_str(text, *width, alignment, truncate));
        line.push_str(" │");
    }
    line
}

pub fn format_clock(time: Option<DateTime<Local>>) -> String {
    time.map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// `H:MM:SS`, fractional seconds dropped.
pub fn format_elapsed(elapsed: Option<TimeDelta>) -> String {
    match elapsed {
        Some(delta) => {
            let secs = delta.num_seconds().max(0);
            format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_speed(speed: Option<f64>) -> String {
    speed
        .map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_status(status: Option<f64>) -> String {
    status
        .map(|s| format!("{:.2} %", s))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Redraws the status table on the terminal after every tracker mutation.
pub struct TableReporter {
    term: Term,
    table: StatusTable,
    clear_screen: bool,
    enabled: bool,
}

impl TableReporter {
    pub fn new(config: &DisplayConfig, enabled: bool) -> Self {
        let term = Term::stdout();
        let styled = term.features().colors_supported();

        Self {
            table: StatusTable::from_config(config).with_styling(styled),
            term,
            clear_screen: config.clear_screen,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn render(&self, records: &[FileRecord]) {
        if !self.enabled {
            return;
        }

        let output = self.table.render(records);
        if self.clear_screen && self.term.is_term() {
            if let Err(e) = self.term.clear_screen() {
                log::warn!("Failed to clear terminal: {}", e);
            }
        }
        if let Err(e) = self.term.write_line(&output) {
            log::warn!("Failed to draw status table: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::PdfFile;
    use crate::tracker::ProgressTracker;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn tracker_with(names: &[&str]) -> ProgressTracker {
        ProgressTracker::new(
            names
                .iter()
                .map(|name| PdfFile {
                    path: PathBuf::from(name),
                    name: name.to_string(),
                    size: 2048,
                    page_count: 10,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_formatters() {
        assert_eq!(format_clock(None), "-");
        assert_eq!(format_clock(Some(noon())), "12:00:00");
        assert_eq!(format_elapsed(None), "-");
        assert_eq!(format_elapsed(Some(TimeDelta::milliseconds(3_725_900))), "1:02:05");
        assert_eq!(format_speed(None), "-");
        assert_eq!(format_speed(Some(1.0 / 3.0)), "0.33");
        assert_eq!(format_status(None), "-");
        assert_eq!(format_status(Some(0.0)), "0.00 %");
        assert_eq!(format_status(Some(51.111)), "51.11 %");
    }

    #[test]
    fn test_row_cells_for_pending_and_running_records() {
        let mut tracker = tracker_with(&["a.pdf", "b.pdf"]);
        tracker.start_at("a.pdf", noon()).unwrap();
        tracker
            .record_progress_at("a.pdf", 5, 5, 5.0, noon() + TimeDelta::seconds(5))
            .unwrap();

        let a = StatusTable::row_cells(tracker.record(0).unwrap());
        assert_eq!(
            a,
            [
                "1", "a.pdf", "2.0 KB", "10", "12:00:00", "12:00:10", "0:00:05", "1.00",
                "50.00 %"
            ]
            .map(String::from)
        );

        let b = StatusTable::row_cells(tracker.record(1).unwrap());
        assert_eq!(b[0], "2");
        assert_eq!(b[4], "-");
        assert_eq!(b[5], "12:00:20");
        assert_eq!(b[6], "-");
        assert_eq!(b[8], "-");
    }

    #[test]
    fn test_render_layout() {
        let tracker = tracker_with(&["a.pdf", "b.pdf", "c.pdf"]);
        let output = StatusTable::new("FILES STATUS", 110).render(tracker.records());
        let lines: Vec<&str> = output.lines().collect();

        // title, top border, header, separator, three rows, bottom border
        assert_eq!(lines.len(), 8);
        assert!(lines[0].trim() == "FILES STATUS");
        assert!(lines[4].contains("a.pdf"));
        assert!(lines[6].contains("c.pdf"));
        assert!(lines.iter().all(|l| measure_text_width(l) <= 110));

        // centred: the table starts after some padding
        assert!(lines[1].starts_with(' '));
    }

    #[test]
    fn test_render_keeps_cells_that_fit_intact() {
        let tracker = tracker_with(&["a.pdf"]);
        let output = StatusTable::new("FILES STATUS", 110).render(tracker.records());
        let lines: Vec<&str> = output.lines().map(str::trim_start).collect();

        assert_eq!(
            lines[1],
            "┌───┬───────┬────────┬───────┬───────┬────────┬─────┬─────────────┬────────┐"
        );
        assert_eq!(
            lines[2],
            "│ № │ File  │   Size │ Pages │ Start │ Finish │ Dur │ Speed (p/s) │ Status │"
        );
        assert_eq!(
            lines[4],
            "│ 1 │ a.pdf │ 2.0 KB │    10 │ -     │ -      │   - │           - │      - │"
        );
        assert!(!output.contains('…'));
    }

    #[test]
    fn test_long_names_are_truncated_to_fit() {
        let long_name = format!("{}.pdf", "quarterly_financial_statement_".repeat(5));
        let tracker = tracker_with(&[long_name.as_str()]);
        let output = StatusTable::new("FILES STATUS", 80).render(tracker.records());

        assert!(output.lines().all(|l| measure_text_width(l) <= 80));
        assert!(output.contains('…'));
    }

    #[test]
    fn test_disabled_reporter_is_silent() {
        let reporter = TableReporter::new(&DisplayConfig::default(), false);
        assert!(!reporter.is_enabled());
        reporter.render(&[]);
    }
}

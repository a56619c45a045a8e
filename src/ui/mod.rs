pub mod output;
pub mod progress;
pub mod status_table;

pub use output::{format_bytes, format_duration, OutputFormatter, OutputMode};
pub use progress::ProgressManager;
pub use status_table::{StatusTable, TableReporter};

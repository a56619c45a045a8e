pub mod output_manager;
pub mod table_extractor;

pub use output_manager::{FileSummary, JsonTableSink, ResultSink, RunReport};
pub use table_extractor::{ExtractedTable, RowSplitter, TableExtractor, TextTableExtractor};

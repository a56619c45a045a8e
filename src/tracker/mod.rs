pub mod progress_tracker;
pub mod record;

pub use progress_tracker::ProgressTracker;
pub use record::{FileRecord, RecordPhase};

pub mod connectors;
pub mod report;

pub use connectors::{FileSnapshotWriter, GenomeFileSet, TwisTranscriptSimulator};
pub use report::{RunSummary, write_history_csv};

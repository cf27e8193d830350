pub mod environment;
pub mod genome_files;
pub mod twistranscript;

pub use environment::load_target_expression;
pub use genome_files::{FileSnapshotWriter, GenomeFileSet, load_genome};
pub use twistranscript::TwisTranscriptSimulator;

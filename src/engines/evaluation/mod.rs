pub mod fitness;
pub mod simulator;

pub use fitness::compute_fitness;
pub use simulator::{Evaluation, ExpressionSimulator, NullSnapshotWriter, RetryPolicy, SnapshotWriter};

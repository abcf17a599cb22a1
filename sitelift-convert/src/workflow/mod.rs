//! Job orchestration: identity, progress reporting and the stage pipeline

pub mod job;
pub mod pipeline;
pub mod progress;

pub use job::ConversionJob;
pub use pipeline::run_conversion;
pub use progress::{progress_channel, ProgressReporter, ProgressStream};

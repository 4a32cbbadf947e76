pub mod batch;
pub mod config;
mod orchestrator;
pub mod report;
mod types;

pub use batch::analyze_batch;
pub use config::AnalysisConfig;
pub use orchestrator::DropAnalyzer;
pub use report::{AnalysisOutcome, AnalysisReport, Observation};
pub use types::{AnalysisStage, NoOpReporter, ProgressReporter};

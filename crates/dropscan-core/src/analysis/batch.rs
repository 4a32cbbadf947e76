use std::path::PathBuf;

use rayon::prelude::*;
use tracing::info;

use super::orchestrator::DropAnalyzer;
use super::report::AnalysisOutcome;

/// Analyze several videos in parallel with one shared analyzer.
///
/// Each video gets its own source and accumulator; only the configuration and
/// the loaded model are shared. Outcomes are returned in input order, and a
/// failed video never affects the others.
pub fn analyze_batch(analyzer: &DropAnalyzer, paths: &[PathBuf]) -> Vec<AnalysisOutcome> {
    info!(
        videos = paths.len(),
        model = analyzer.classifier().model().name(),
        "Starting batch analysis"
    );
    paths
        .par_iter()
        .map(|path| AnalysisOutcome::from(analyzer.analyze(path)))
        .collect()
}

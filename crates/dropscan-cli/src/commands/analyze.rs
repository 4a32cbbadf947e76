use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use dropscan_core::analysis::{
    analyze_batch, AnalysisConfig, AnalysisOutcome, AnalysisStage, DropAnalyzer, ProgressReporter,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use crate::summary::{print_analysis_header, print_outcome};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input video files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Analysis config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Classifier model (JSON), overrides the config
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Drives an indicatif bar from analysis progress events.
struct BarReporter {
    pb: ProgressBar,
}

impl BarReporter {
    fn new() -> Result<Self> {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg:20} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { pb })
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: AnalysisStage, total_items: Option<usize>) {
        self.pb.set_message(stage.to_string());
        self.pb.set_position(0);
        self.pb.set_length(total_items.unwrap_or(0) as u64);
    }

    fn advance(&self, items_done: usize) {
        if self.pb.length().is_some_and(|len| len < items_done as u64) {
            self.pb.set_length(items_done as u64);
        }
        self.pb.set_position(items_done as u64);
    }
}

#[derive(Serialize)]
struct FileOutcome<'a> {
    file: String,
    #[serde(flatten)]
    outcome: &'a AnalysisOutcome,
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let mut config = if let Some(ref config_path) = args.config {
        AnalysisConfig::from_file(config_path)
            .with_context(|| format!("Invalid analysis config {}", config_path.display()))?
    } else {
        AnalysisConfig::default()
    };
    if let Some(ref model) = args.model {
        config.model = Some(model.clone());
    }

    debug!(?config, "Analysis config");

    let analyzer = DropAnalyzer::from_config(config);

    let outcomes = if let [file] = args.files.as_slice() {
        vec![analyze_one(&analyzer, file, args.json)?]
    } else {
        analyze_batch(&analyzer, &args.files)
    };

    if args.json {
        print_json(&args.files, &outcomes)?;
    } else {
        if args.files.len() > 1 {
            print_analysis_header(analyzer.config(), analyzer.classifier().model().name());
        }
        for (file, outcome) in args.files.iter().zip(outcomes.iter()) {
            print_outcome(file, outcome);
        }
    }

    let failed = outcomes.iter().filter(|o| o.error().is_some()).count();
    if failed > 0 && !args.json {
        anyhow::bail!("{} of {} video(s) could not be analyzed", failed, outcomes.len());
    }
    Ok(())
}

fn analyze_one(analyzer: &DropAnalyzer, file: &Path, quiet: bool) -> Result<AnalysisOutcome> {
    if quiet {
        return Ok(analyzer.analyze(file).into());
    }

    print_analysis_header(analyzer.config(), analyzer.classifier().model().name());
    let reporter = Arc::new(BarReporter::new()?);
    let result = analyzer.analyze_reported(file, reporter.clone());
    reporter.pb.finish_with_message("Done");
    Ok(result.into())
}

fn print_json(files: &[PathBuf], outcomes: &[AnalysisOutcome]) -> Result<()> {
    let text = if let [outcome] = outcomes {
        serde_json::to_string_pretty(outcome)?
    } else {
        let rows: Vec<_> = files
            .iter()
            .zip(outcomes.iter())
            .map(|(file, outcome)| FileOutcome {
                file: file.display().to_string(),
                outcome,
            })
            .collect();
        serde_json::to_string_pretty(&rows)?
    };
    println!("{}", text);
    Ok(())
}

use std::path::Path;

use console::Style;
use dropscan_core::analysis::{AnalysisConfig, AnalysisOutcome, AnalysisReport};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    error: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            error: Style::new().red().bold(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_analysis_header(config: &AnalysisConfig, model_name: &str) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Dropscan Analysis"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(17)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Stride"),
        s.value.apply_to(format!("every {} frames", config.sampling.stride))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Max width"),
        s.value.apply_to(format!("{} px", config.sampling.max_width))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Polarity"),
        s.method.apply_to(config.detection.polarity)
    );
    if config.model.is_some() || model_name != "heuristic" {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Classifier"),
            s.method.apply_to(model_name)
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Classifier"),
            s.disabled.apply_to("heuristic only")
        );
    }
    println!();
}

pub fn print_outcome(file: &Path, outcome: &AnalysisOutcome) {
    let s = Styles::new();

    println!("  {}", s.path.apply_to(file.display()));
    match outcome {
        AnalysisOutcome::Report(report) => print_report(&s, report),
        AnalysisOutcome::Failed { error } => {
            println!("    {}", s.error.apply_to(error));
        }
    }
    println!();
}

fn print_report(s: &Styles, report: &AnalysisReport) {
    println!("    {}", s.header.apply_to("Motion"));
    row(s, "Speed", format!("{:.2} px\u{b2}/s", report.speed));
    row(s, "Direction", report.direction.to_string());
    row(s, "Duration", format!("{:.2} s", report.duration_sec));

    println!("    {}", s.header.apply_to("Shape"));
    row(s, "Shape", report.shape.to_string());
    row(s, "Circularity", format!("{:.2}", report.circularity));
    row(s, "Irregularity", format!("{:.2}", report.irregularity));
    row(s, "Area", format!("{} px\u{b2}", report.area_px));
    row(s, "Perimeter", format!("{} px", report.perimeter_px));
}

fn row(s: &Styles, label: &str, value: String) {
    println!(
        "      {:<14}{}",
        s.label.apply_to(label),
        s.value.apply_to(value)
    );
}
